use std::process;

use uvcbuild_sdk::BuildError;

fn main() {
    let cli = uvcbuild::parse_args();
    uvcbuild::init_logging(cli.verbose);

    if let Err(err) = uvcbuild::run(cli) {
        eprintln!("error: {:#}", err);
        let code = err
            .downcast_ref::<BuildError>()
            .map(BuildError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}
