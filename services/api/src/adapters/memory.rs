//! services/api/src/adapters/memory.rs
//!
//! In-memory repository adapters implementing the repository ports from the
//! `justificante_core` crate. These stand in for the future document store:
//! list-all serves fixed seed data, and create logs the record and
//! acknowledges it without committing anything durable.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use justificante_core::domain::Student;
use justificante_core::ports::{JustificanteRepository, PortResult, StudentRepository};

/// The fixed engineering roster served until a real store is connected.
pub fn seed_roster() -> Vec<Student> {
    let seed = [
        ("001234", "García Martínez, Juan Carlos", "Ing. en Sistemas Computacionales"),
        ("001235", "López Hernández, María Fernanda", "Ing. Industrial"),
        ("001236", "Rodríguez Pérez, Luis Alberto", "Ing. Mecatrónica"),
        ("001237", "Sánchez González, Ana Patricia", "Ing. en Sistemas Computacionales"),
        ("001238", "Torres Ramírez, Carlos Eduardo", "Ing. Civil"),
        ("001239", "Flores Morales, Diana Laura", "Ing. Industrial"),
        ("001240", "Mendoza Silva, Roberto José", "Ing. Mecatrónica"),
        ("001241", "Castro Ruiz, Sofía Alejandra", "Ing. en Sistemas Computacionales"),
    ];
    seed.iter()
        .map(|(id, name, career)| Student {
            id: id.to_string(),
            name: name.to_string(),
            career: career.to_string(),
        })
        .collect()
}

/// A student repository backed by the seed roster.
#[derive(Clone)]
pub struct MemoryStudentRepo {
    roster: Vec<Student>,
}

impl MemoryStudentRepo {
    pub fn new() -> Self {
        Self { roster: seed_roster() }
    }
}

impl Default for MemoryStudentRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentRepository for MemoryStudentRepo {
    async fn list_all(&self) -> PortResult<Vec<Student>> {
        Ok(self.roster.clone())
    }

    async fn create(&self, record: Value) -> PortResult<String> {
        // Logged only; nothing is committed until the document store exists.
        info!(trace_id = %Uuid::new_v4(), record = %record, "Creating student");
        Ok("Student created".to_string())
    }
}

/// A justificante repository with no stored records yet.
#[derive(Clone, Default)]
pub struct MemoryJustificanteRepo;

impl MemoryJustificanteRepo {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JustificanteRepository for MemoryJustificanteRepo {
    async fn list_all(&self) -> PortResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn create(&self, record: Value) -> PortResult<String> {
        info!(trace_id = %Uuid::new_v4(), record = %record, "Creating justificante");
        Ok("Justificante created".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn student_list_serves_the_seed_roster() {
        let repo = MemoryStudentRepo::new();
        let students = repo.list_all().await.unwrap();
        assert_eq!(students.len(), 8);
        assert_eq!(students[0].id, "001234");
        assert_eq!(students[0].name, "García Martínez, Juan Carlos");
    }

    #[tokio::test]
    async fn student_create_acknowledges_without_storing() {
        let repo = MemoryStudentRepo::new();
        let message = repo
            .create(json!({ "id": "009999", "name": "Nuevo, Alumno" }))
            .await
            .unwrap();
        assert_eq!(message, "Student created");
        // The roster is unchanged: the write was only logged.
        assert_eq!(repo.list_all().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn justificante_list_stays_empty_after_create() {
        let repo = MemoryJustificanteRepo::new();
        repo.create(json!({ "reason": "Cita médica" })).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
