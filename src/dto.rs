use rust_decimal::Decimal;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ledger::Command;
use crate::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Add,
    Pay,
    Details,
    Due,
}

/// One line of a command script: `command,id,name,amount`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CommandRow {
    #[serde(rename = "command")]
    pub kind: CommandType,
    pub id: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub amount: Option<Decimal>,
}

impl TryFrom<CommandRow> for Command {
    type Error = Error;

    fn try_from(row: CommandRow) -> Result<Self, Self::Error> {
        let missing = |field: &str| Error::InvalidInput(format!("{} requires {}", row.id, field));
        Ok(match row.kind {
            CommandType::Add => Command::Add {
                name: row.name.ok_or_else(|| missing("a name"))?,
                fees: row.amount.ok_or_else(|| missing("an amount"))?,
                id: row.id,
            },
            CommandType::Pay => Command::Pay {
                amount: row.amount.ok_or_else(|| missing("an amount"))?,
                id: row.id,
            },
            CommandType::Details => Command::Details { id: row.id },
            CommandType::Due => Command::DueFees { id: row.id },
        })
    }
}

/// Parses a decimal from its textual form, keeping the scale as written
/// (`"500.0"` stays `500.0`).
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Decimal::from_str(raw.trim()).map_err(D::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| Decimal::from_str(raw.trim()))
        .transpose()
        .map_err(D::Error::custom)
}
