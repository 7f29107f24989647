use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use teaching_load::{Classes, Roster, Subject, Teacher};

fn reader<R: Read>(rdr: R, delimiter: u8) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(rdr)
}

fn parse_classes(field: &str, what: &str) -> Result<Classes, Box<dyn Error>> {
    if field.is_empty() {
        return Ok(0);
    }
    field
        .parse()
        .map_err(|e| format!("invalid class count {field:?} for {what}: {e}").into())
}

fn non_empty(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|f| !f.is_empty())
}

/// Read the teachers roster: `name;offered;code...`, one teacher per row. Rows without a name
/// are ignored and empty subject cells are dropped.
pub fn read_teachers<R: Read>(rdr: R, delimiter: u8) -> Result<Vec<Teacher>, Box<dyn Error>> {
    let mut teachers = Vec::new();
    for record in reader(rdr, delimiter).records() {
        let record = record?;
        let name = match non_empty(&record, 0) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let offered_classes = parse_classes(record.get(1).unwrap_or(""), &name)?;
        let preferences = record
            .iter()
            .skip(2)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        teachers.push(Teacher {
            name,
            offered_classes,
            preferences,
        });
    }
    Ok(teachers)
}

/// Read the subjects roster: `code;name;classes`, one subject per row. A row lacking a code or a
/// class count whose first non-empty cell is an integer declares the total number of classes.
pub fn read_subjects<R: Read>(
    rdr: R,
    delimiter: u8,
) -> Result<(Vec<Subject>, Option<Classes>), Box<dyn Error>> {
    let mut subjects = Vec::new();
    let mut total = None;
    for record in reader(rdr, delimiter).records() {
        let record = record?;
        match (non_empty(&record, 0), non_empty(&record, 2)) {
            (Some(code), Some(_)) => {
                let row = StringRecord::from(record.iter().take(3).collect::<Vec<_>>());
                let subject: Subject = row
                    .deserialize(None)
                    .map_err(|e| format!("invalid subject row for {code}: {e}"))?;
                subjects.push(subject);
            }
            _ => {
                let first = match record.iter().find(|f| !f.is_empty()) {
                    Some(first) => first,
                    None => continue,
                };
                let declared = first
                    .parse()
                    .map_err(|_| format!("unexpected subjects row: {record:?}"))?;
                if total.replace(declared).is_some() {
                    log::warn!("several total rows in subjects roster, using the last one");
                }
            }
        }
    }
    Ok((subjects, total))
}

pub fn read_roster(
    teachers: &Path,
    subjects: &Path,
    delimiter: u8,
) -> Result<Roster, Box<dyn Error>> {
    let open = |path: &Path| {
        File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))
    };

    let teachers = read_teachers(open(teachers)?, delimiter)?;
    let (subjects, total) = read_subjects(open(subjects)?, delimiter)?;
    log::info!(
        "read {} teachers and {} subjects",
        teachers.len(),
        subjects.len()
    );

    let roster = Roster::new(teachers, subjects);
    Ok(match total {
        Some(total) => {
            if total != roster.total_classes() {
                log::warn!(
                    "declared total of {total} classes differs from the subjects' sum of {}",
                    roster.total_classes()
                );
            }
            roster.with_total_classes(total)
        }
        None => roster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEACHERS: &str = "\
Professor;Turmas;Disciplina 1;Disciplina 2;Disciplina 3;Disciplina 4
Ada;4;CSI101;CSI102;;
Bob;0;;;;
;;;;;
Cid;2;CSI101;;;
";

    const SUBJECTS: &str = "\
Codigo;Nome;Turmas
CSI101;Algoritmos;3
CSI102;Estruturas de Dados;2
;;
5;;
";

    #[test]
    fn reads_teachers_and_drops_blank_cells() {
        let teachers = read_teachers(TEACHERS.as_bytes(), b';').unwrap();
        assert_eq!(teachers.len(), 3);
        assert_eq!(teachers[0].preferences, vec!["CSI101", "CSI102"]);
        assert_eq!(teachers[1].offered_classes, 0);
        assert!(teachers[1].preferences.is_empty());
        assert_eq!(teachers[2].name, "Cid");
    }

    #[test]
    fn reads_subjects_with_trailing_total() {
        let (subjects, total) = read_subjects(SUBJECTS.as_bytes(), b';').unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[1].name, "Estruturas de Dados");
        assert_eq!(subjects[0].classes, 3);
        assert_eq!(total, Some(5));
    }

    #[test]
    fn extra_subject_cells_are_ignored() {
        let (subjects, _) =
            read_subjects("c;n;t\nA;Alpha;1;note\n".as_bytes(), b';').unwrap();
        assert_eq!(
            subjects,
            vec![Subject {
                code: "A".to_string(),
                name: "Alpha".to_string(),
                classes: 1
            }]
        );
    }

    #[test]
    fn total_row_is_optional() {
        let (subjects, total) = read_subjects("c;n;t\nA;Alpha;1\n".as_bytes(), b';').unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(total, None);
    }

    #[test]
    fn malformed_counts_are_errors() {
        assert!(read_teachers("h;h\nAda;many;X\n".as_bytes(), b';').is_err());
        assert!(read_subjects("h;h;h\nA;Alpha;lots\n".as_bytes(), b';').is_err());
        assert!(read_subjects("h;h;h\nnot a total;;\n".as_bytes(), b';').is_err());
    }
}
