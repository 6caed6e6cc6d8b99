//! Text and JSON rendering

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use sonos_state::{GroupRole, Snapshot, SnapshotView, SpeakerIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn identities(identities: &[SpeakerIdentity], format: Format) -> Result<String> {
    if format == Format::Json {
        return json(identities);
    }
    if identities.is_empty() {
        return Ok("No speakers found".to_string());
    }

    let mut out = String::new();
    for identity in identities {
        writeln!(
            out,
            "{:<15} {:<20} {:<16} {}",
            identity.address, identity.room_name, identity.model_name, identity.uuid
        )?;
    }
    Ok(out.trim_end().to_string())
}

pub fn snapshot(snapshot: &Snapshot, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(snapshot);
    }
    if snapshot.speakers.is_empty() {
        return Ok("No speakers".to_string());
    }

    let mut out = String::new();
    for (coordinator, members) in snapshot.topology.groups() {
        let names: Vec<String> = members
            .iter()
            .map(|address| {
                snapshot
                    .get(*address)
                    .map_or_else(|| address.to_string(), |view| view.identity.room_name.clone())
            })
            .collect();
        writeln!(out, "[{}] {}", coordinator, names.join(" + "))?;
        for address in members {
            if let Some(view) = snapshot.get(address) {
                writeln!(out, "  {}", view_line(view))?;
            }
        }
    }
    if snapshot.topology_stale {
        writeln!(out, "(group information is stale)")?;
    }
    Ok(out.trim_end().to_string())
}

pub fn view(view: &SnapshotView, format: Format) -> Result<String> {
    match format {
        Format::Json => json(view),
        Format::Text => Ok(view_line(view)),
    }
}

fn view_line(view: &SnapshotView) -> String {
    let role = match view.role {
        GroupRole::MemberOf(_) => "member",
        GroupRole::Coordinator => "coordinator",
        GroupRole::Standalone => "standalone",
    };

    let Some(playback) = view.playback.as_ref().filter(|_| view.reachable) else {
        return format!("{:<20} {:<15} unavailable", view.identity.room_name, view.address);
    };

    let mut line = format!(
        "{:<20} {:<15} {:<13} vol {:>3}{} {:<11}",
        view.identity.room_name,
        view.address,
        playback.transport_state.to_string(),
        playback.volume,
        if playback.muted { " (muted)" } else { "" },
        role,
    );
    if !playback.track.is_empty() {
        let _ = write!(line, " {}", playback.track.title.as_deref().unwrap_or_default());
        if let Some(artist) = &playback.track.artist {
            let _ = write!(line, " / {}", artist);
        }
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonos_state::{PlaybackState, TrackRecord};
    use std::net::Ipv4Addr;

    fn view(reachable: bool) -> SnapshotView {
        let address = Ipv4Addr::new(192, 168, 2, 30);
        SnapshotView {
            address,
            identity: SpeakerIdentity {
                uuid: "RINCON_30".to_string(),
                address,
                room_name: "Kitchen".to_string(),
                model_name: "Sonos One".to_string(),
                model_number: None,
                software_version: None,
                hardware_version: None,
                serial_number: None,
                mac_address: None,
            },
            reachable,
            playback: Some(PlaybackState {
                volume: 12,
                track: TrackRecord {
                    title: Some("Teardrop".to_string()),
                    artist: Some("Massive Attack".to_string()),
                    ..TrackRecord::default()
                },
                ..PlaybackState::default()
            }),
            role: GroupRole::Standalone,
            group_members: vec![address],
            last_seen: None,
        }
    }

    #[test]
    fn test_view_line() {
        let line = view_line(&view(true));
        assert!(line.starts_with("Kitchen"));
        assert!(line.contains("vol  12"));
        assert!(line.ends_with("Teardrop / Massive Attack"));
    }

    #[test]
    fn test_unreachable_view() {
        assert!(view_line(&view(false)).ends_with("unavailable"));
    }

    #[test]
    fn test_json_view() {
        let rendered = super::view(&view(true), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["role"], "standalone");
        assert_eq!(value["playback"]["volume"], 12);
    }

    #[test]
    fn test_empty_identities() {
        assert_eq!(identities(&[], Format::Text).unwrap(), "No speakers found");
        assert_eq!(identities(&[], Format::Json).unwrap(), "[]");
    }
}
