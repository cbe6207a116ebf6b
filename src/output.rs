use std::io::{self, Write};

/// Writes `message` to stdout and, when given, to `writer` as well.
///
/// A failing stdout is reported on stderr but not treated as an error; a failing `writer` is.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        eprintln!("Failed to write to stdout: {e}");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}
