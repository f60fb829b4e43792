use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let stdout = io::stdout();
    let code = stdf_wafermap::cli::run(
        std::env::args().skip(1),
        &mut stdout.lock(),
        &mut io::stderr(),
    );
    ExitCode::from(code)
}
