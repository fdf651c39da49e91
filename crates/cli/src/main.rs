use anyhow::Result;

fn main() -> Result<()> {
    deploy_select_cli::main_entry()
}
