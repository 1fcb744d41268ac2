//! Interactive prompt for poking at the command set without a server.
//! Each line is dispatched as a simple-string request against a local
//! store, bypassing the wire protocol entirely.

use std::io::{self, BufRead, Write};

use memds::commands::executable::Executable;
use memds::commands::Command;
use memds::frame::Frame;
use memds::store::Store;

fn main() -> io::Result<()> {
    let store = Store::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "memds> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let request = Frame::Simple(line.to_string());
        match Command::try_from(request).and_then(|cmd| cmd.exec(store.clone())) {
            Ok(frame) => writeln!(stdout, "{}", frame)?,
            Err(err) => writeln!(stdout, "(error) {}", err)?,
        }
    }

    Ok(())
}
