use argtree::{Argument, Command, Driver, Flag};

pub fn counter() -> Command {
    let count = Flag::new("count", &["--count", "-c"], Driver::count_flag()).unwrap();
    let name = Flag::new("name", &["--name", "-n"], Driver::value::<String>()).unwrap();

    let mut cmd = Command::new("cmd");
    cmd.add_flag(count).add_flag(name.required(true));
    cmd
}

pub fn echo() -> Command {
    let mut cmd = Command::new("echo");
    cmd.add_argument(Argument::new("text", "TEXT", Driver::value::<String>()).unwrap())
        .add_flag(Flag::new("upper", &["--upper", "-u"], Driver::on_flag()).unwrap());
    cmd
}
