//! Prints predictions, one `"<prefix>: <label>"` line per classifier.

use std::io::{self, Write};

use warta_types::Prediction;

pub fn write_report<W: Write>(out: &mut W, predictions: &[Prediction]) -> io::Result<()> {
    for prediction in predictions {
        writeln!(out, "{prediction}")?;
    }
    out.flush()
}
