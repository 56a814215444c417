//! Чтение и запись таблиц, сохранение и загрузка объектов

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, Result, ResultExt};
use crate::types::Table;

/// Загрузить таблицу из CSV (первая строка - заголовок)
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .data_context(format!("cannot open dataset {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .data_context(format!("cannot read header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(PipelineError::data(format!(
            "dataset {} has no header",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.data_context(format!("malformed record in {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(PipelineError::data(format!(
            "dataset {} contains no rows",
            path.display()
        )));
    }

    Table::new(headers, rows)
}

/// Сохранить таблицу в CSV с заголовком
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let context = || format!("cannot write {}", path.display());

    let mut writer = csv::Writer::from_path(path).io_context(context())?;
    writer.write_record(table.headers()).io_context(context())?;
    for row in table.rows() {
        writer.write_record(row).io_context(context())?;
    }
    writer.flush().io_context(context())?;

    Ok(())
}

/// Сохранить объект в JSON, создавая родительские директории
pub fn save_object<T: Serialize>(path: impl AsRef<Path>, obj: &T) -> Result<()> {
    let path = path.as_ref();

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .io_context(format!("cannot create directory {}", dir.display()))?;
    }

    let file = File::create(path).io_context(format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, obj)
        .io_context(format!("cannot serialize object to {}", path.display()))?;
    writer
        .flush()
        .io_context(format!("cannot flush {}", path.display()))?;

    tracing::info!("Object saved at {}", path.display());
    Ok(())
}

/// Загрузить объект, ранее сохраненный через [`save_object`]
pub fn load_object<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).io_context(format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .data_context(format!("cannot deserialize object from {}", path.display()))
}
