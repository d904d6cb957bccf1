//! Demo roster and buildings loaded when `facility.seed_demo_data` is on.

use chrono::{DateTime, Utc, Weekday};
use uuid::Uuid;

use super::{DataStore, Repository};
use crate::core::events::ChangeNotifier;
use crate::facility::{Building, Room, RoomType};
use crate::people::{Agent, AgentStatus, RoleType, WeeklySchedule};

/// Stable ids so the demo data survives restarts.
pub fn demo_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("colonyops-demo-{name}").as_bytes())
}

fn week(weekdays: &str, wednesday: Option<&str>, saturday: &str) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::six_days(weekdays);
    if let Some(hours) = wednesday {
        *schedule.slot_mut(Weekday::Wed) = hours.to_string();
    }
    *schedule.slot_mut(Weekday::Sat) = saturday.to_string();
    schedule
}

#[allow(clippy::too_many_arguments)]
fn agent(
    key: &str,
    first_name: &str,
    last_name: &str,
    role_label: &str,
    role_type: RoleType,
    weekly_schedule: WeeklySchedule,
    leave_days: &[&str],
    notes: &str,
) -> Agent {
    Agent {
        id: demo_id(key),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: String::new(),
        phone: String::new(),
        role_label: role_label.to_string(),
        role_type,
        role_color: role_type.default_color().to_string(),
        weekly_schedule,
        leave_days: leave_days.iter().map(|d| d.to_string()).collect(),
        status: AgentStatus::Active,
        manager_notes: Some(notes.to_string()),
        detailed_schedules: Vec::new(),
    }
}

pub fn demo_agents() -> Vec<Agent> {
    vec![
        agent(
            "agent-1",
            "Alexis",
            "Audic",
            "Responsable",
            RoleType::Manager,
            week("08:00-18:00", None, "09:00-17:00"),
            &["2024-01-15", "2024-01-16"],
            "Responsable de l'équipe technique",
        ),
        agent(
            "agent-2",
            "Pierre",
            "Martin",
            "Agent technique",
            RoleType::Technical,
            week("07:00-15:00", Some("08:00-16:00"), "08:00-12:00"),
            &["2024-01-20"],
            "Spécialisé en électricité et plomberie",
        ),
        agent(
            "agent-3",
            "Sophie",
            "Bernard",
            "Agent d'entretien",
            RoleType::Maintenance,
            week("09:00-17:00", None, "10:00-14:00"),
            &["2024-01-25", "2024-01-26"],
            "Très efficace pour l'entretien général",
        ),
    ]
}

fn room(id: &str, name: &str, room_type: RoomType, agent: &str, task: &str, notes: Option<&str>) -> Room {
    Room {
        id: id.to_string(),
        name: name.to_string(),
        room_type,
        agent_id: Some(demo_id(agent)),
        assigned_task: Some(task.to_string()),
        notes: notes.map(str::to_string),
    }
}

pub fn demo_buildings() -> Vec<Building> {
    // 2024-01-01T00:00:00Z
    let created_at = DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default();
    let building = |key: &str, name: &str, description: &str, color: &str, rooms: Vec<Room>| Building {
        id: demo_id(key),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        created_at,
        rooms,
    };

    vec![
        building(
            "building-a",
            "Bâtiment A",
            "Bâtiment principal avec chambres et espaces communs",
            "#3b82f6",
            vec![
                room("a1", "Chambres 1-10", RoomType::Bedroom, "agent-3", "Nettoyage quotidien", Some("Vérifier l'état des lits")),
                room("a2", "Couloir principal", RoomType::Other, "agent-3", "Entretien", Some("Nettoyage sol et murs")),
                room("a3", "Salle commune", RoomType::CommonRoom, "agent-2", "Maintenance électrique", Some("Vérifier éclairage et prises")),
            ],
        ),
        building(
            "building-b",
            "Bâtiment B",
            "Bâtiment avec cuisine et réfectoire",
            "#10b981",
            vec![
                room("b1", "Chambres 11-20", RoomType::Bedroom, "agent-3", "Nettoyage quotidien", None),
                room("b2", "Cuisine", RoomType::Kitchen, "agent-2", "Vérification équipements", Some("Contrôle sécurité gaz et électricité")),
                room("b3", "Réfectoire", RoomType::CommonRoom, "agent-3", "Nettoyage approfondi", None),
            ],
        ),
        building(
            "building-c",
            "Bâtiment C",
            "Bâtiment administratif et infirmerie",
            "#f59e0b",
            vec![
                room("c1", "Infirmerie", RoomType::Other, "agent-2", "Maintenance préventive", Some("Vérification équipements médicaux")),
                room("c2", "Bureau direction", RoomType::Office, "agent-3", "Entretien", None),
                room("c3", "Salle d'activités", RoomType::CommonRoom, "agent-2", "Vérification éclairage", None),
            ],
        ),
    ]
}

/// Store pre-filled with the demo roster and buildings; other collections
/// start empty.
pub fn demo_store(notifier: ChangeNotifier) -> DataStore {
    let mut store = DataStore::new(notifier);
    store.agents = Repository::from_vec(demo_agents());
    store.buildings = Repository::from_vec(demo_buildings());
    store
}
