use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use unshred_evolution::RunParams;

/// Destination of a JSON document: a file, or stdout when no path is given.
#[derive(Debug)]
pub enum Output {
    Stdout(io::Stdout),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Output::File {
                    writer: BufWriter::new(file),
                    path,
                }
            }
            None => Output::Stdout(io::stdout()),
        };
        output.write_json(value)
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let result = {
            let writer: &mut dyn Write = match self {
                Output::Stdout(stdout) => stdout,
                Output::File { writer, .. } => writer,
            };
            serde_json::to_writer_pretty(&mut *writer, value)
                .map_err(anyhow::Error::from)
                .and_then(|()| writeln!(writer).map_err(anyhow::Error::from))
                .and_then(|()| writer.flush().map_err(anyhow::Error::from))
        };
        result.with_context(|| format!("Failed to write JSON to {}", self.display_path()))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })
}

/// Read run parameters from a JSON file
///
/// Missing fields take their default values; unknown fields are rejected.
pub fn read_params_file<P>(path: P) -> anyhow::Result<RunParams>
where
    P: AsRef<Path>,
{
    read_json_file("run parameters", path)
}
