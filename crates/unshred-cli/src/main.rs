mod command;
mod oracle;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
