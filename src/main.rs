//! The interactive read loop.
//!
//! Reads one line at a time from standard input, parses it, and reports
//! either an acknowledgment or the error. Exits with status 0 at end of
//! input.

use std::io::{self, BufRead, Write};

use prequel::syntax::Reader;

fn main() -> io::Result<()> {
    let reader = Reader::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut line = String::new();

    stdout.write_all(b"prequel interpreter\n")?;
    loop {
        stdout.write_all(b"?- ")?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // End of input.
            stdout.write_all(b"\n")?;
            return Ok(());
        }

        match reader.parse_str(&line) {
            Ok(_) => stdout.write_all(b"okay\n")?,
            Err(err) => writeln!(stdout, "{}", err)?,
        }
    }
}
