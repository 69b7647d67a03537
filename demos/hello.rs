use argtree::{Argument, Command, Driver, Flag, Program};

fn main() {
    env_logger::init();

    let mut cmd = Command::new("hello");
    cmd.add_argument(Argument::new("name", "NAME", Driver::value::<String>()).unwrap())
        .add_flag(Flag::new("emoji", &["--emoji", "-e"], Driver::on_flag()).unwrap())
        .add_flag(Flag::new("help", &["--help", "-h"], Driver::help()).unwrap())
        .add_flag(Flag::new("version", &["--version", "-V"], Driver::version()).unwrap());

    let mut program =
        Program::new(cmd).version(env!("CARGO_PKG_VERSION")).help("Usage: hello [--emoji] NAME");
    program.run_or_exit();

    let flags = program.command();
    let name = flags.get::<String>("name").map(String::as_str).unwrap_or_default();
    let bang = if flags.get::<bool>("emoji") == Some(&true) { "❣️" } else { "!" };
    println!("Hello {}{}", name, bang);
}
