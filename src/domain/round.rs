use super::Id;
use serde::Serialize;
use std::time::SystemTime;

/// Lifecycle state of a Round. No back-transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundStatus {
    #[serde(rename = "waiting_actions")]
    WaitingActions,
    #[serde(rename = "ready_to_publish")]
    ReadyToPublish,
    #[serde(rename = "completed")]
    Completed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingActions => "waiting_actions",
            Self::ReadyToPublish => "ready_to_publish",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for RoundStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting_actions" => Ok(Self::WaitingActions),
            "ready_to_publish" => Ok(Self::ReadyToPublish),
            "completed" => Ok(Self::Completed),
            other => Err(anyhow::anyhow!("unknown round status {other}")),
        }
    }
}

/// Display hint for the client: a derived function of `round_number`, except
/// that INDICATOR overrides NORMAL for rounds 7-10 once indicators exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "MESSAGE")]
    Message,
    #[serde(rename = "INDICATOR")]
    Indicator,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Message => "MESSAGE",
            Self::Indicator => "INDICATOR",
        }
    }

    /// The phase a freshly created round takes, before any indicator has been
    /// assigned. Rounds 5-6 are for messages; everything else is normal.
    pub fn base_for(round_number: i32) -> Self {
        if crate::MESSAGE_ROUNDS.contains(&round_number) {
            Self::Message
        } else {
            Self::Normal
        }
    }

    /// The phase to actually show a client: `base_for` overridden by
    /// INDICATOR once indicators exist and this round is one of 7-10.
    pub fn display_for(round_number: i32, indicators_assigned: bool) -> Self {
        if indicators_assigned && (7..=10).contains(&round_number) {
            Self::Indicator
        } else {
            Self::base_for(round_number)
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "MESSAGE" => Ok(Self::Message),
            "INDICATOR" => Ok(Self::Indicator),
            other => Err(anyhow::anyhow!("unknown phase {other}")),
        }
    }
}

/// One of the ten rounds played out within a Room.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub id: Id,
    pub room_id: Id,
    pub round_number: i32,
    pub phase: Phase,
    pub status: RoundStatus,
    pub skipped: bool,
    pub started_at: SystemTime,
    pub ended_at: Option<SystemTime>,
}
