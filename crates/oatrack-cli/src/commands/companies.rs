use anyhow::Result;

use super::Session;

pub async fn run(session: &Session) -> Result<()> {
    let view = session.view();
    for company in &view.table.companies.options {
        println!("{}", company);
    }
    Ok(())
}
