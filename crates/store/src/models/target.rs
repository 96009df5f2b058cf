use crate::types::Target;

#[derive(sqlx::FromRow)]
pub(crate) struct TargetRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) bssid: String,
}
impl From<TargetRow> for Target {
    fn from(row: TargetRow) -> Self {
        Self { id: row.id, name: row.name, bssid: row.bssid }
    }
}
