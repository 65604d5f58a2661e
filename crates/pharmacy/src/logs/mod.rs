#[cfg(feature = "query_logs")]
pub mod queries;

#[cfg(not(feature = "query_logs"))]
pub mod queries {
    use anyhow::Result;

    use crate::systems::workbench::PharmacySnapshot;

    #[derive(Debug)]
    pub struct QueryLog<'a> {
        pub command: &'a str,
        pub snapshot: &'a PharmacySnapshot,
    }

    pub fn write_query(_log: QueryLog<'_>) -> Result<()> {
        Ok(())
    }
}
