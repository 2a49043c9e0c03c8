//! Hop records and the ordered hop log.

use serde::{Deserialize, Serialize};

/// Status recorded for a hop that answered normally.
pub const STATUS_OK: u16 = 200;

/// One service's participation in a request chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRecord {
    /// Hop identifier as it appeared in the request path.
    pub service_name: String,

    /// Observed status, `None` while the hop is still pending.
    #[serde(default)]
    pub status: Option<u16>,
}

impl HopRecord {
    /// A record whose outcome is not known yet.
    pub fn pending(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            status: None,
        }
    }

    /// A record with a known outcome.
    pub fn with_status(service_name: impl Into<String>, status: u16) -> Self {
        Self {
            service_name: service_name.into(),
            status: Some(status),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_none()
    }

    /// True for a 200 status and for a pending hop.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, None | Some(STATUS_OK))
    }
}

/// Ordered, append-only record of the hops a request traversed.
///
/// Serializes as a bare JSON array so it can be embedded in the
/// `service_log` field of the structured response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HopLog {
    records: Vec<HopRecord>,
}

impl HopLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HopRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HopRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&HopRecord> {
        self.records.last()
    }

    pub fn get(&self, index: usize) -> Option<&HopRecord> {
        self.records.get(index)
    }

    /// Append a record, returning its index.
    pub fn push(&mut self, record: HopRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Record the observed status of the hop at `index`.
    ///
    /// Returns `false` when no such hop exists.
    pub fn annotate(&mut self, index: usize, status: u16) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.status = Some(status);
                true
            }
            None => false,
        }
    }

    /// Record the status of the last hop.
    pub fn annotate_last(&mut self, status: u16) -> bool {
        match self.records.len() {
            0 => false,
            n => self.annotate(n - 1, status),
        }
    }

    /// Number of records without a terminal status.
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }

    /// At most the last record may still be pending.
    pub fn is_well_formed(&self) -> bool {
        match self.records.split_last() {
            Some((_, head)) => head.iter().all(|r| !r.is_pending()),
            None => true,
        }
    }
}

impl From<Vec<HopRecord>> for HopLog {
    fn from(records: Vec<HopRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<HopRecord> for HopLog {
    fn from_iter<I: IntoIterator<Item = HopRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HopLog {
    type Item = &'a HopRecord;
    type IntoIter = std::slice::Iter<'a, HopRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
