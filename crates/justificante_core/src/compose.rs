//! crates/justificante_core/src/compose.rs
//!
//! Renders the plain-text justificante document sent to the coordinator.
//! Everything here is a pure function; the only non-deterministic input is
//! the "generated at" timestamp supplied by the caller.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{JustificanteData, Student};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Inclusive day count between two dates: `day_count(d, d) == 1`.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// `dd/mm/yyyy`, the es-MX short date format.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// A single localized date for one-day absences, otherwise the localized
/// range annotated with the inclusive day count.
pub fn format_period(start: NaiveDate, end: NaiveDate) -> String {
    let days = day_count(start, end);
    if days == 1 {
        format_date(start)
    } else {
        format!("{} - {} ({} días)", format_date(start), format_date(end), days)
    }
}

/// The subject line prefilled by the send form.
pub fn default_subject(reason: &str) -> String {
    format!("Justificante de Ausencia - {reason}")
}

/// Splits a comma-separated CC list, trimming whitespace per entry and
/// dropping empty entries. Order is preserved.
pub fn parse_cc_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders the full justificante document.
///
/// Enumerates every validated student with id, name and career, and omits the
/// additional-message block entirely when the message is empty.
pub fn render_document(
    data: &JustificanteData,
    students: &[Student],
    additional_message: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut doc = String::new();

    doc.push_str("JUSTIFICANTE DE AUSENCIA - CETYS UNIVERSIDAD\n");
    doc.push_str("Escuela de Ingeniería\n\n");
    doc.push_str(SEPARATOR);
    doc.push_str("\n\n");

    doc.push_str("INFORMACIÓN DEL JUSTIFICANTE:\n");
    let _ = writeln!(doc, "• Motivo: {}", data.reason);
    let _ = writeln!(
        doc,
        "• Período de Ausencia: {}",
        format_period(data.start_date, data.end_date)
    );
    let _ = writeln!(
        doc,
        "• Horario de Clase: {} - {}",
        data.start_hour.format("%H:%M"),
        data.end_hour.format("%H:%M")
    );
    let _ = writeln!(doc, "• Descripción: {}", data.description);
    doc.push('\n');

    let _ = writeln!(doc, "ESTUDIANTES AFECTADOS ({}):", students.len());
    for (index, student) in students.iter().enumerate() {
        let _ = writeln!(doc, "{}. {}", index + 1, student.name);
        let _ = writeln!(doc, "   ID: {}", student.id);
        let _ = writeln!(doc, "   Carrera: {}", student.career);
    }

    if !additional_message.trim().is_empty() {
        doc.push('\n');
        doc.push_str("MENSAJE ADICIONAL:\n");
        doc.push_str(additional_message.trim());
        doc.push('\n');
    }

    doc.push('\n');
    doc.push_str(SEPARATOR);
    doc.push_str("\n\n");
    doc.push_str("Generado automáticamente por el Sistema de Justificantes\n");
    let _ = writeln!(doc, "{}", generated_at.format("%d/%m/%Y %H:%M"));

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn data() -> JustificanteData {
        JustificanteData {
            reason: "Cita médica".to_string(),
            start_date: date("2025-03-10"),
            end_date: date("2025-03-10"),
            start_hour: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_hour: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            description: "Consulta en el IMSS".to_string(),
        }
    }

    fn students() -> Vec<Student> {
        vec![
            Student {
                id: "001234".to_string(),
                name: "García Martínez, Juan Carlos".to_string(),
                career: "Ing. en Sistemas Computacionales".to_string(),
            },
            Student {
                id: "001237".to_string(),
                name: "Sánchez González, Ana Patricia".to_string(),
                career: "Ing. en Sistemas Computacionales".to_string(),
            },
        ]
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap()
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(day_count(date("2025-03-10"), date("2025-03-10")), 1);
        assert_eq!(day_count(date("2025-03-10"), date("2025-03-12")), 3);
        assert_eq!(day_count(date("2025-02-27"), date("2025-03-02")), 4);
    }

    #[test]
    fn period_is_a_single_date_for_one_day() {
        assert_eq!(format_period(date("2025-03-10"), date("2025-03-10")), "10/03/2025");
    }

    #[test]
    fn period_is_an_annotated_range_for_multiple_days() {
        assert_eq!(
            format_period(date("2025-03-10"), date("2025-03-12")),
            "10/03/2025 - 12/03/2025 (3 días)"
        );
    }

    #[test]
    fn cc_list_drops_blanks_and_trims() {
        assert_eq!(
            parse_cc_list("a@x.com, , b@x.com ,"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
        assert!(parse_cc_list("").is_empty());
        assert!(parse_cc_list(" , ,").is_empty());
    }

    #[test]
    fn document_enumerates_every_student() {
        let doc = render_document(&data(), &students(), "", generated_at());
        assert!(doc.contains("ESTUDIANTES AFECTADOS (2):"));
        assert!(doc.contains("1. García Martínez, Juan Carlos"));
        assert!(doc.contains("   ID: 001234"));
        assert!(doc.contains("2. Sánchez González, Ana Patricia"));
        assert!(doc.contains("   Carrera: Ing. en Sistemas Computacionales"));
    }

    #[test]
    fn document_omits_additional_message_section_when_empty() {
        let doc = render_document(&data(), &students(), "", generated_at());
        assert!(!doc.contains("MENSAJE ADICIONAL"));

        let doc = render_document(&data(), &students(), "   ", generated_at());
        assert!(!doc.contains("MENSAJE ADICIONAL"));
    }

    #[test]
    fn document_includes_additional_message_when_present() {
        let doc = render_document(&data(), &students(), "Favor de confirmar.", generated_at());
        assert!(doc.contains("MENSAJE ADICIONAL:\nFavor de confirmar."));
    }

    #[test]
    fn document_is_deterministic_given_the_timestamp() {
        let a = render_document(&data(), &students(), "nota", generated_at());
        let b = render_document(&data(), &students(), "nota", generated_at());
        assert_eq!(a, b);
        assert!(a.contains("12/03/2025 09:30"));
    }

    #[test]
    fn default_subject_embeds_the_reason() {
        assert_eq!(default_subject("Cita médica"), "Justificante de Ausencia - Cita médica");
    }
}
