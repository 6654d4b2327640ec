//! Synthetic course data for load and timing runs.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub prefix: String,
    pub start: u32,
    /// Exclusive.
    pub end: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: "TEST".to_string(),
            start: 1000,
            end: 3000,
        }
    }
}

impl GeneratorConfig {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record for course `i`. Prerequisites follow `i % 4`: none for 0, the
    /// previous course for 1 and 2, the previous and the third-previous
    /// course for 3.
    pub fn record(&self, i: u32) -> String {
        let p = &self.prefix;
        let mut record = format!("{p}{i},Course Title for {p}{i}");
        match i % 4 {
            1 | 2 => record.push_str(&format!(",{p}{}", i - 1)),
            3 => record.push_str(&format!(",{p}{},{p}{}", i - 1, i - 3)),
            _ => {}
        }
        record
    }

    /// Lines in increasing course number order (for equal-width numbers).
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..self.end).map(move |i| self.record(i))
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<usize> {
        let mut count = 0;
        for line in self.lines() {
            writeln!(writer, "{}", line)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> io::Result<usize> {
        let file = File::create(path.as_ref())?;
        let count = self.write_to(BufWriter::new(file))?;
        log::info!("wrote {} records to {}", count, path.as_ref().display());
        Ok(count)
    }
}
