//! Tracked-player roster loaded from a newline-delimited id file.

use std::path::Path;

use crate::domain::AccountId;
use crate::error::LoadError;

/// Non-empty, ordered list of tracked accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    accounts: Vec<AccountId>,
}

impl Roster {
    /// Read and parse the roster file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    /// Parse roster text. Blank lines are skipped; 64-bit Steam ids are
    /// converted to account numbers.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, LoadError> {
        let mut accounts = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            let value = line.trim();
            if value.is_empty() {
                continue;
            }
            let line = index + 1;
            let id: i64 = value.parse().map_err(|source| LoadError::Parse {
                line,
                value: value.to_string(),
                source,
            })?;
            let account =
                AccountId::normalize(id).ok_or(LoadError::NonPositive { line, value: id })?;
            accounts.push(account);
        }
        if accounts.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { accounts })
    }

    /// Build a roster directly; `None` when `accounts` is empty.
    #[must_use]
    pub fn from_accounts(accounts: Vec<AccountId>) -> Option<Self> {
        (!accounts.is_empty()).then_some(Self { accounts })
    }

    #[must_use]
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.accounts.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::STEAM_ID64_OFFSET;
    use std::io::Write;

    fn parse(raw: &str) -> Result<Roster, LoadError> {
        Roster::parse(raw, Path::new("account_id"))
    }

    #[test]
    fn blank_lines_are_skipped() {
        let roster = parse("\n 86745912 \n\n").unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.accounts()[0].get(), 86_745_912);
    }

    #[test]
    fn order_is_preserved_and_steam_ids_converted() {
        let raw = format!("3\n{}\n1\n", STEAM_ID64_OFFSET + 2);
        let ids: Vec<i64> = parse(&raw).unwrap().iter().map(AccountId::get).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn only_blank_lines_is_empty_error() {
        assert!(matches!(parse("\n  \n\n"), Err(LoadError::Empty { .. })));
        assert!(matches!(parse(""), Err(LoadError::Empty { .. })));
    }

    #[test]
    fn garbage_is_parse_error_with_line() {
        match parse("1\nabc\n") {
            Err(LoadError::Parse { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_positive_is_rejected() {
        assert!(matches!(
            parse("0\n"),
            Err(LoadError::NonPositive { line: 1, value: 0 })
        ));
        assert!(matches!(parse("-4"), Err(LoadError::NonPositive { .. })));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n123\n").unwrap();
        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Roster::load(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
