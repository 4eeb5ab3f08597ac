//! linemark CLI - Markdown to HTML

use std::io::{self, Read, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Read from the named file, or from stdin for `-` or no argument.
    let input = if args.len() > 1 && args[1] != "-" {
        std::fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let html = linemark::render(&input);
    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.write_all(b"\n")?;

    Ok(())
}
