use crate::error::{Error, ErrorKind};
use crate::types::Wordlist;
use exn::ResultExt;

#[derive(sqlx::FromRow)]
pub(crate) struct WordlistRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) size: String,
    pub(crate) avg_run: i64,
}
impl TryFrom<WordlistRow> for Wordlist {
    type Error = Error;
    fn try_from(row: WordlistRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            size: row.size,
            avg_run: u64::try_from(row.avg_run).or_raise(|| ErrorKind::InvalidData("average run"))?,
        })
    }
}
