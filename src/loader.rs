//! Bulk loading of comma-separated course records.
//!
//! Each non-empty line is `number,title[,prerequisite...]`. Malformed lines
//! and duplicate course numbers are reported and skipped; loading goes on
//! with the next line.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{
    catalog::{Course, CourseCatalog},
    error::CatalogError,
};

/// A line the loader refused, with the reason.
#[derive(Debug)]
pub struct RejectedLine {
    pub line: usize,
    pub error: CatalogError,
}

/// Outcome of a bulk load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped_blank: usize,
    pub rejected: Vec<RejectedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse one record. Returns `Ok(None)` for an empty line.
///
/// Fields are not trimmed. A single trailing empty field (`A,B,`) is not
/// counted as a prerequisite.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Course>, CatalogError> {
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split_terminator(',');
    let (number, title) = match (fields.next(), fields.next()) {
        (Some(number), Some(title)) if !number.is_empty() => (number, title),
        _ => {
            return Err(CatalogError::MalformedRecord {
                line: line_no,
                content: line.to_string(),
            })
        }
    };

    Ok(Some(Course::new(number, title).with_prerequisites(fields)))
}

/// Strip the line terminator (`\n` or `\r\n`) and decode as UTF-8.
fn decode_line(line_no: usize, raw: &[u8]) -> Result<&str, CatalogError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).map_err(|_| CatalogError::MalformedRecord {
        line: line_no,
        content: String::from_utf8_lossy(raw).into_owned(),
    })
}

/// Load every record readable from `reader` into `catalog`.
///
/// Lines are decoded one at a time, so a line that is not valid UTF-8 is
/// rejected like any other malformed record. A read failure stops the load
/// with [`CatalogError::SourceUnavailable`]; courses inserted before it stay
/// in the catalog.
pub fn load_from_reader<R: BufRead>(
    catalog: &mut CourseCatalog,
    mut reader: R,
    source: &Path,
) -> Result<LoadReport, CatalogError> {
    let mut report = LoadReport::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source_err| CatalogError::SourceUnavailable {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let outcome = match decode_line(line_no, &buf).and_then(|line| parse_line(line_no, line)) {
            Ok(None) => {
                report.skipped_blank += 1;
                continue;
            }
            Ok(Some(course)) => catalog.insert(course),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => report.loaded += 1,
            Err(error) => {
                log::warn!("{}:{}: skipping line: {}", source.display(), line_no, error);
                report.rejected.push(RejectedLine {
                    line: line_no,
                    error,
                });
            }
        }
    }

    log::info!(
        "loaded {} courses from {} ({} rejected, {} blank)",
        report.loaded,
        source.display(),
        report.rejected.len(),
        report.skipped_blank
    );

    Ok(report)
}

/// Open `path` and load it. An unopenable file leaves the catalog untouched.
pub fn load_from_path(
    catalog: &mut CourseCatalog,
    path: impl AsRef<Path>,
) -> Result<LoadReport, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::SourceUnavailable {
        path: PathBuf::from(path),
        source,
    })?;
    load_from_reader(catalog, BufReader::new(file), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fields() {
        let course = parse_line(1, "CS301,Algorithms,CS201,CS101").unwrap().unwrap();
        assert_eq!(course.number, "CS301");
        assert_eq!(course.title, "Algorithms");
        assert_eq!(course.prerequisites, vec!["CS201", "CS101"]);

        let course = parse_line(1, "CS101,Intro to CS").unwrap().unwrap();
        assert!(course.prerequisites.is_empty());
    }

    #[test]
    fn parse_keeps_inner_empty_fields() {
        let course = parse_line(1, "A,B,,C,").unwrap().unwrap();
        assert_eq!(course.prerequisites, vec!["", "C"]);
    }

    #[test]
    fn parse_does_not_trim() {
        let course = parse_line(1, " CS1 , Title").unwrap().unwrap();
        assert_eq!(course.number, " CS1 ");
        assert_eq!(course.title, " Title");
    }

    #[test]
    fn parse_rejects_short_lines() {
        assert!(parse_line(1, "").unwrap().is_none());
        for bad in ["BADLINE", "BADLINE,", ",Title only", " "] {
            match parse_line(4, bad) {
                Err(CatalogError::MalformedRecord { line, content }) => {
                    assert_eq!(line, 4);
                    assert_eq!(content, bad);
                }
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn decode_strips_terminators() {
        assert_eq!(decode_line(1, b"CS101,Intro\r\n").unwrap(), "CS101,Intro");
        assert_eq!(decode_line(1, b"CS101,Intro\n").unwrap(), "CS101,Intro");
        assert_eq!(decode_line(1, b"CS101,Intro").unwrap(), "CS101,Intro");
        assert!(matches!(
            decode_line(3, b"CS1\xff2,Bad\n"),
            Err(CatalogError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn duplicate_lines_are_reported() {
        let mut catalog = CourseCatalog::new();
        let input = "CS101,Intro\nCS101,Again\nCS102,Next\n";
        let report = load_from_reader(&mut catalog, input.as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line, 2);
        assert_eq!(catalog.search("CS101").unwrap().title, "Intro");
    }
}
