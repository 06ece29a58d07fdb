use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use log::debug;

use crate::error::{HematiteError, Result};
use crate::network::network::Network;

// ---------------------------------------------------------------------------
// Text model format
// ---------------------------------------------------------------------------

impl Network {
    /// Writes the model in the text format: `n_inputs n_hidden n_outputs` on
    /// the first line, then one value per line: the 2 biases, every input
    /// weight (row-major by hidden unit), every hidden weight (row-major by
    /// output unit).
    ///
    /// Values use Rust's shortest round-trippable `f64` formatting, so a
    /// save/restore cycle reproduces the network exactly.
    pub fn save<W: Write>(&self, dest: &mut W) -> Result<()> {
        let (n_inputs, n_hidden, n_outputs) = self.dimensions();
        writeln!(dest, "{n_inputs} {n_hidden} {n_outputs}")?;

        for b in self.biases() {
            writeln!(dest, "{b}")?;
        }
        for w in self.input_weights() {
            writeln!(dest, "{w}")?;
        }
        for w in self.hidden_weights() {
            writeln!(dest, "{w}")?;
        }
        Ok(())
    }

    /// Reads a model in the text format written by [`Network::save`].
    ///
    /// Structural problems are errors: a source that ends before all
    /// required values are read or contains a non-numeric token is
    /// `MalformedModel`, and a non-positive dimension is `InvalidDimension`.
    /// Weight values are accepted as-is: out-of-range and non-finite values
    /// load unchanged, so externally produced model files are usable.
    /// Tokens after the last required value are ignored.
    pub fn restore<R: Read>(mut source: R) -> Result<Network> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        let n_inputs = read_dimension(&mut tokens, "n_inputs")?;
        let n_hidden = read_dimension(&mut tokens, "n_hidden")?;
        let n_outputs = read_dimension(&mut tokens, "n_outputs")?;

        let biases = [
            read_value(&mut tokens, "bias")?,
            read_value(&mut tokens, "bias")?,
        ];
        let input_weights =
            read_values(&mut tokens, weight_count(n_inputs, n_hidden)?, "input weight")?;
        let hidden_weights =
            read_values(&mut tokens, weight_count(n_hidden, n_outputs)?, "hidden weight")?;

        Network::from_parts(n_inputs, n_hidden, n_outputs, biases, input_weights, hidden_weights)
    }

    /// Saves the text format to a file.
    pub fn save_file(&self, path: &str) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        debug!("saved model to {path}");
        Ok(())
    }

    /// Loads the text format from a file.
    pub fn load_file(path: &str) -> Result<Network> {
        let file = File::open(path)?;
        let net = Network::restore(BufReader::new(file))?;
        debug!("loaded model from {path}");
        Ok(net)
    }
}

fn read_dimension<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<usize> {
    let token = tokens
        .next()
        .ok_or_else(|| HematiteError::MalformedModel(format!("source ended before {name}")))?;
    let value: i64 = token
        .parse()
        .map_err(|_| HematiteError::MalformedModel(format!("non-numeric {name}: `{token}`")))?;
    if value <= 0 {
        return Err(HematiteError::InvalidDimension(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(value as usize)
}

fn read_value<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<f64> {
    let token = tokens
        .next()
        .ok_or_else(|| HematiteError::MalformedModel(format!("source ended before {what}")))?;
    token
        .parse()
        .map_err(|_| HematiteError::MalformedModel(format!("non-numeric {what}: `{token}`")))
}

fn read_values<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    count: usize,
    what: &str,
) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(read_value(tokens, what)?);
    }
    Ok(values)
}

fn weight_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        HematiteError::InvalidDimension("dimensions overflow the weight count".into())
    })
}

// ---------------------------------------------------------------------------
// JSON model format
// ---------------------------------------------------------------------------

impl Network {
    /// Serializes the network to a pretty-printed JSON file. The text format
    /// stays canonical; JSON is a convenience for tooling that already
    /// speaks it.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// [`Network::save_json`].
    pub fn load_json(path: &str) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
