use crate::cli::TableArgs;
use crate::error::Result;
use crate::report;
use pointsym::core::chartab::catalog::catalog;

pub async fn run(args: TableArgs) -> Result<()> {
    let table = catalog().lookup(&args.point_group)?;
    print!("{}", report::character_table(table));
    Ok(())
}
