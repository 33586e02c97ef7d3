use clonegen::cli;

fn main() -> anyhow::Result<()> {
    clonegen::init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
