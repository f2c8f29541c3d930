use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: i64,
    pub clerk_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: i64,
    pub clerk_id: String,
    pub approved_hours: i64,
    pub rate: f64,
    pub manager_id: i64,
}

/// The authenticated identity resolved to its role row.
#[derive(Debug, Clone, PartialEq)]
pub enum Caller {
    Contractor(Contractor),
    Manager(Manager),
}

impl Caller {
    pub fn role(&self) -> &'static str {
        match self {
            Caller::Contractor(_) => "contractor",
            Caller::Manager(_) => "manager",
        }
    }

    pub fn clerk_id(&self) -> &str {
        match self {
            Caller::Contractor(c) => &c.clerk_id,
            Caller::Manager(m) => &m.clerk_id,
        }
    }

    /// The contractor row, or `None` for managers.
    pub fn as_contractor(&self) -> Option<&Contractor> {
        match self {
            Caller::Contractor(c) => Some(c),
            Caller::Manager(_) => None,
        }
    }
}

/// Shape returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub role: String,
    pub id: i64,
    pub clerk_id: String,
    pub manager_id: Option<i64>,
}

impl From<&Caller> for Me {
    fn from(caller: &Caller) -> Self {
        match caller {
            Caller::Contractor(c) => Me {
                role: caller.role().to_string(),
                id: c.id,
                clerk_id: c.clerk_id.clone(),
                manager_id: Some(c.manager_id),
            },
            Caller::Manager(m) => Me {
                role: caller.role().to_string(),
                id: m.id,
                clerk_id: m.clerk_id.clone(),
                manager_id: None,
            },
        }
    }
}
