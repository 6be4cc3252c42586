//! Whole-model serialization as a single bincode blob

use crate::algorithm::model::Model;
use crate::io::error::{Result, SynthesisError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Encode the model into any writer
///
/// # Errors
///
/// Returns an error if encoding or writing fails
pub fn write_model<W: Write>(model: &Model, writer: W) -> Result<()> {
    bincode::serialize_into(writer, model).map_err(|source| SynthesisError::ModelEncode {
        path: "<stream>".into(),
        source,
    })
}

/// Decode a model from any reader
///
/// # Errors
///
/// Returns an error if the stream is truncated, not a model, or decodes to
/// a model that fails [`Model::validate`]
pub fn read_model<R: Read>(reader: R) -> Result<Model> {
    let model: Model = bincode::deserialize_from(reader)?;
    model.validate()?;
    Ok(model)
}

/// Write the model to `path`, replacing any existing file
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails
pub fn save_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SynthesisError::FileSystem {
        path: path.to_path_buf(),
        operation: "create model file",
        source,
    })?;

    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, model).map_err(|source| SynthesisError::ModelEncode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| SynthesisError::FileSystem {
        path: path.to_path_buf(),
        operation: "flush model file",
        source,
    })
}

/// Read a model previously written by [`save_model`]
///
/// # Errors
///
/// Returns an error if the file cannot be opened, decoding fails or the
/// decoded model fails [`Model::validate`]
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SynthesisError::FileSystem {
        path: path.to_path_buf(),
        operation: "open model file",
        source,
    })?;

    let model: Model =
        bincode::deserialize_from(BufReader::new(file)).map_err(|source| {
            SynthesisError::ModelDecode {
                path: path.to_path_buf(),
                source,
            }
        })?;
    model.validate()?;
    Ok(model)
}
