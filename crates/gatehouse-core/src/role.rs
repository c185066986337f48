//! Roles used for RBAC.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Role carried by an identity and by every credential issued for it.
///
/// Roles form no hierarchy: `Admin` does not satisfy a gate that only lists
/// `User`. Two roles match only when they are the same variant. A hierarchy,
/// if ever needed, belongs in an explicit partial order, not here.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}
