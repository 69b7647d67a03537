use argtree::{Command, Driver, Flag};

pub fn cmd() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.add_flag(Flag::new("a", &["-a"], Driver::on_flag()).unwrap())
        .add_flag(Flag::new("b", &["-b"], Driver::on_flag()).unwrap())
        .add_flag(Flag::new("out", &["--out", "-o"], Driver::value::<String>()).unwrap())
        .add_flag(Flag::new("foo", &["--foo"], Driver::value::<String>()).unwrap())
        .add_flag(Flag::new("quiet", &["--quiet", "-q"], Driver::off_flag()).unwrap());
    cmd
}
