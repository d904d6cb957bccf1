//! In-memory store for every collection the dashboard edits.
//!
//! Writes go through `DataStore` methods so each successful change is
//! announced on the `ChangeNotifier`. Readers that only need derived views
//! use the `StorageAccessor` trait.

pub mod repository;
#[cfg(feature = "demo-data")]
pub mod seed;

use log::info;
use std::collections::HashMap;
use uuid::Uuid;

pub use repository::{Entity, Repository};

use crate::calendar::CalendarEvent;
use crate::core::error::{ColonyError, ColonyResult};
use crate::core::events::{ChangeNotifier, Collection};
use crate::facility::Building;
use crate::incidents::Incident;
use crate::messages::Message;
use crate::people::{validate_leave_days, Agent};
use crate::schedule::{recurrence, schedules_for_agent, DetailedScheduleEntry};
use crate::settings::FacilitySettings;
use crate::tasks::{bulk_assign, Task};

macro_rules! entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn entity_id(&self) -> Uuid {
                self.id
            }
        }
    };
}

entity!(Agent, "agent");
entity!(Task, "task");
entity!(Incident, "incident");
entity!(Message, "message");
entity!(CalendarEvent, "calendar event");
entity!(Building, "building");

/// Read side used by the status and calendar views.
pub trait StorageAccessor {
    /// Agents with `detailed_schedules` filled from the schedule collection.
    fn list_agents(&self) -> Vec<Agent>;
    fn list_tasks(&self) -> Vec<Task>;
    fn list_incidents(&self) -> Vec<Incident>;
    fn list_calendar_events(&self) -> Vec<CalendarEvent>;
    /// Every stored shift, in roster order then by date.
    fn list_detailed_schedules(&self) -> Vec<DetailedScheduleEntry>;
    fn detailed_schedules_for(&self, agent_id: Uuid) -> Vec<DetailedScheduleEntry>;
}

#[derive(Debug)]
pub struct DataStore {
    pub agents: Repository<Agent>,
    /// Detailed entries keyed by agent id
    pub schedules: HashMap<Uuid, Vec<DetailedScheduleEntry>>,
    pub tasks: Repository<Task>,
    pub incidents: Repository<Incident>,
    /// Newest first
    pub messages: Repository<Message>,
    pub calendar_events: Repository<CalendarEvent>,
    pub buildings: Repository<Building>,
    pub settings: FacilitySettings,
    notifier: ChangeNotifier,
}

impl DataStore {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            agents: Repository::new(),
            schedules: HashMap::new(),
            tasks: Repository::new(),
            incidents: Repository::new(),
            messages: Repository::new(),
            calendar_events: Repository::new(),
            buildings: Repository::new(),
            settings: FacilitySettings::default(),
            notifier,
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn changed(&self, collection: Collection) {
        self.notifier.publish(collection);
    }

    pub fn agent(&self, id: Uuid) -> ColonyResult<Agent> {
        let mut agent = self.agents.require(id)?.clone();
        agent.detailed_schedules = self.detailed_schedules_for(id);
        Ok(agent)
    }

    pub fn create_agent(&mut self, mut agent: Agent) -> ColonyResult<Agent> {
        validate_leave_days(&agent.leave_days)?;
        let inline = std::mem::take(&mut agent.detailed_schedules);
        let agent = self.agents.create(agent)?;
        if !inline.is_empty() {
            self.schedules.entry(agent.id).or_default().extend(inline);
        }
        info!("Agent created: {} ({})", agent.display_name(), agent.id);
        self.changed(Collection::Agents);
        Ok(agent)
    }

    /// Edits a copy first so a rejected edit leaves the stored agent untouched.
    /// Shifts live in the schedule collection and are not touched here.
    pub fn update_agent<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<Agent>
    where
        F: FnOnce(&mut Agent),
    {
        let mut edited = self.agents.require(id)?.clone();
        apply(&mut edited);
        validate_leave_days(&edited.leave_days)?;
        edited.id = id;
        edited.detailed_schedules.clear();

        self.agents.update(id, |agent| *agent = edited)?;
        let agent = self.agent(id)?;
        info!("Agent updated: {} ({})", agent.display_name(), agent.id);
        self.changed(Collection::Agents);
        Ok(agent)
    }

    /// Removes the agent together with every shift stored under it.
    pub fn delete_agent(&mut self, id: Uuid) -> ColonyResult<Agent> {
        let agent = self.agents.delete(id)?;
        let dropped = self.schedules.remove(&id).map_or(0, |entries| entries.len());
        info!(
            "Agent removed: {} ({}), {dropped} shift(s) dropped",
            agent.display_name(),
            agent.id
        );
        self.changed(Collection::Agents);
        if dropped > 0 {
            self.changed(Collection::Schedules);
        }
        Ok(agent)
    }

    /// Expands `template` and stores every occurrence under its agent.
    pub fn add_schedule(
        &mut self,
        template: DetailedScheduleEntry,
    ) -> ColonyResult<Vec<DetailedScheduleEntry>> {
        self.agents.require(template.agent_id)?;
        let occurrences = recurrence::expand(&template)?;
        self.schedules
            .entry(template.agent_id)
            .or_default()
            .extend(occurrences.iter().cloned());
        info!(
            "Stored {} schedule entr{} for agent {}",
            occurrences.len(),
            if occurrences.len() == 1 { "y" } else { "ies" },
            template.agent_id
        );
        self.changed(Collection::Schedules);
        Ok(occurrences)
    }

    /// Edits one stored entry; the owning agent cannot change.
    pub fn update_schedule<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<DetailedScheduleEntry>
    where
        F: FnOnce(&mut DetailedScheduleEntry),
    {
        let entry = self
            .schedules
            .values_mut()
            .flat_map(|entries| entries.iter_mut())
            .find(|entry| entry.id == id)
            .ok_or_else(|| ColonyError::NotFound(format!("schedule entry {id}")))?;
        let agent_id = entry.agent_id;
        apply(&mut *entry);
        entry.agent_id = agent_id;
        let entry = entry.clone();

        info!("Schedule entry {id} updated for agent {agent_id}");
        self.changed(Collection::Schedules);
        Ok(entry)
    }

    pub fn delete_schedule(&mut self, id: Uuid) -> ColonyResult<DetailedScheduleEntry> {
        let entry = self
            .schedules
            .values_mut()
            .find_map(|entries| {
                let index = entries.iter().position(|entry| entry.id == id)?;
                Some(entries.remove(index))
            })
            .ok_or_else(|| ColonyError::NotFound(format!("schedule entry {id}")))?;
        info!("Schedule entry {id} removed for agent {}", entry.agent_id);
        self.changed(Collection::Schedules);
        Ok(entry)
    }

    pub fn create_task(&mut self, task: Task) -> ColonyResult<Task> {
        let task = self.tasks.create(task)?;
        info!("Task created: {} ({})", task.title, task.id);
        self.changed(Collection::Tasks);
        Ok(task)
    }

    pub fn update_task<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<Task>
    where
        F: FnOnce(&mut Task),
    {
        let task = self.tasks.update(id, apply)?;
        info!("Task {} is now {}", task.id, task.status.as_str());
        self.changed(Collection::Tasks);
        Ok(task)
    }

    pub fn delete_task(&mut self, id: Uuid) -> ColonyResult<Task> {
        let task = self.tasks.delete(id)?;
        info!("Task removed: {} ({id})", task.title);
        self.changed(Collection::Tasks);
        Ok(task)
    }

    pub fn bulk_assign_tasks(&mut self, agent_id: Uuid, limit: usize) -> ColonyResult<Vec<Uuid>> {
        self.agents.require(agent_id)?;
        let assigned = bulk_assign(self.tasks.as_mut_slice(), agent_id, limit);
        if !assigned.is_empty() {
            self.changed(Collection::Tasks);
        }
        Ok(assigned)
    }

    pub fn create_incident(&mut self, incident: Incident) -> ColonyResult<Incident> {
        let incident = self.incidents.create(incident)?;
        self.changed(Collection::Incidents);
        Ok(incident)
    }

    pub fn update_incident<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<Incident>
    where
        F: FnOnce(&mut Incident),
    {
        let incident = self.incidents.update(id, apply)?;
        info!("Incident {} is now {}", incident.id, incident.state.as_str());
        self.changed(Collection::Incidents);
        Ok(incident)
    }

    pub fn post_message(&mut self, message: Message) -> ColonyResult<Message> {
        let message = self.messages.push_front(message)?;
        info!("Message posted by {}", message.author);
        self.changed(Collection::Messages);
        Ok(message)
    }

    pub fn delete_message(&mut self, id: Uuid) -> ColonyResult<Message> {
        let message = self.messages.delete(id)?;
        info!("Message {id} removed");
        self.changed(Collection::Messages);
        Ok(message)
    }

    pub fn create_calendar_event(&mut self, event: CalendarEvent) -> ColonyResult<CalendarEvent> {
        let event = self.calendar_events.create(event)?;
        info!("Calendar event '{}' on {}", event.title, event.date);
        self.changed(Collection::CalendarEvents);
        Ok(event)
    }

    pub fn update_calendar_event<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<CalendarEvent>
    where
        F: FnOnce(&mut CalendarEvent),
    {
        let event = self.calendar_events.update(id, apply)?;
        info!("Calendar event '{}' moved to {}", event.title, event.date);
        self.changed(Collection::CalendarEvents);
        Ok(event)
    }

    pub fn delete_calendar_event(&mut self, id: Uuid) -> ColonyResult<CalendarEvent> {
        let event = self.calendar_events.delete(id)?;
        info!("Calendar event '{}' on {} removed", event.title, event.date);
        self.changed(Collection::CalendarEvents);
        Ok(event)
    }

    pub fn create_building(&mut self, building: Building) -> ColonyResult<Building> {
        let building = self.buildings.create(building)?;
        info!("Building created: {} ({} room(s))", building.name, building.rooms.len());
        self.changed(Collection::Buildings);
        Ok(building)
    }

    /// Buildings are replaced with their rooms as one unit.
    pub fn update_building<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<Building>
    where
        F: FnOnce(&mut Building),
    {
        let building = self.buildings.update(id, apply)?;
        info!("Building updated: {} ({} room(s))", building.name, building.rooms.len());
        self.changed(Collection::Buildings);
        Ok(building)
    }

    pub fn delete_building(&mut self, id: Uuid) -> ColonyResult<Building> {
        let building = self.buildings.delete(id)?;
        info!("Building removed: {}", building.name);
        self.changed(Collection::Buildings);
        Ok(building)
    }

    pub fn replace_settings(&mut self, settings: FacilitySettings) -> ColonyResult<FacilitySettings> {
        settings.validate()?;
        self.settings = settings.clone();
        info!("Facility settings updated");
        self.changed(Collection::Settings);
        Ok(settings)
    }
}

impl StorageAccessor for DataStore {
    fn list_agents(&self) -> Vec<Agent> {
        self.agents
            .list()
            .iter()
            .map(|agent| {
                let mut agent = agent.clone();
                agent.detailed_schedules = self.detailed_schedules_for(agent.id);
                agent
            })
            .collect()
    }

    fn list_tasks(&self) -> Vec<Task> {
        self.tasks.list().to_vec()
    }

    fn list_incidents(&self) -> Vec<Incident> {
        self.incidents.list().to_vec()
    }

    fn list_calendar_events(&self) -> Vec<CalendarEvent> {
        self.calendar_events.list().to_vec()
    }

    fn list_detailed_schedules(&self) -> Vec<DetailedScheduleEntry> {
        self.agents
            .list()
            .iter()
            .flat_map(|agent| self.detailed_schedules_for(agent.id))
            .collect()
    }

    fn detailed_schedules_for(&self, agent_id: Uuid) -> Vec<DetailedScheduleEntry> {
        self.schedules
            .get(&agent_id)
            .map(|entries| schedules_for_agent(entries, agent_id, None))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColonyError;
    use crate::people::CreateAgentRequest;
    use crate::schedule::Recurrence;
    use crate::tasks::{TaskPriority, TaskStatus};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn store() -> DataStore {
        DataStore::new(ChangeNotifier::new(16))
    }

    fn agent(first: &str) -> Agent {
        CreateAgentRequest {
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            email: String::new(),
            phone: String::new(),
            role_label: "Agent technique".to_string(),
            role_type: crate::people::RoleType::Technical,
            role_color: None,
            weekly_schedule: Default::default(),
            leave_days: Vec::new(),
            status: None,
            manager_notes: None,
        }
        .into_agent()
    }

    fn task(title: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            agent_id: None,
            building: "Bâtiment A".to_string(),
            priority: TaskPriority::Normal,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            due_date: None,
        }
    }

    #[test]
    fn test_add_schedule_expands_and_hydrates_agent() {
        let mut store = store();
        let pierre = store.create_agent(agent("Pierre")).unwrap();
        let template = DetailedScheduleEntry::recurring(
            pierre.id,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            Recurrence::daily(3),
        );

        let stored = store.add_schedule(template).unwrap();
        assert_eq!(stored.len(), 3);

        let agents = store.list_agents();
        assert_eq!(agents[0].detailed_schedules.len(), 3);
        assert_eq!(store.agent(pierre.id).unwrap().detailed_schedules, stored);
    }

    #[test]
    fn test_add_schedule_for_unknown_agent() {
        let mut store = store();
        let entry = DetailedScheduleEntry::one_off(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        );
        assert!(matches!(store.add_schedule(entry), Err(ColonyError::NotFound(_))));
    }

    #[test]
    fn test_writes_publish_changes() {
        let mut store = store();
        let mut rx = store.notifier().subscribe();

        store.create_task(task("Peinture")).unwrap();
        assert_eq!(rx.try_recv().unwrap().collection, Collection::Tasks);

        assert!(store.update_task(Uuid::new_v4(), |_| {}).is_err());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_bulk_assign_tasks() {
        let mut store = store();
        let pierre = store.create_agent(agent("Pierre")).unwrap();
        for i in 0..7 {
            store.create_task(task(&format!("Tâche {i}"))).unwrap();
        }

        let assigned = store.bulk_assign_tasks(pierre.id, 5).unwrap();
        assert_eq!(assigned.len(), 5);
        let in_progress = store
            .tasks
            .list()
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress && t.agent_id == Some(pierre.id))
            .count();
        assert_eq!(in_progress, 5);

        assert!(store.bulk_assign_tasks(Uuid::new_v4(), 5).is_err());
    }

    #[test]
    fn test_update_agent_validates_leave_days() {
        let mut store = store();
        let pierre = store.create_agent(agent("Pierre")).unwrap();
        let mut rx = store.notifier().subscribe();

        let updated = store
            .update_agent(pierre.id, |a| a.leave_days.push("2024-01-16".to_string()))
            .unwrap();
        assert!(updated.is_on_leave("2024-01-16"));
        assert_eq!(rx.try_recv().unwrap().collection, Collection::Agents);

        let rejected = store.update_agent(pierre.id, |a| a.leave_days = vec!["16/01/2024".to_string()]);
        assert!(matches!(rejected, Err(ColonyError::InvalidInput(_))));
        assert_eq!(store.agent(pierre.id).unwrap().leave_days, vec!["2024-01-16"]);
        assert!(rx.try_recv().is_err());

        let mut bad = agent("Marc");
        bad.leave_days.push("garbage".to_string());
        assert!(store.create_agent(bad).is_err());
        assert_eq!(store.agents.len(), 1);
    }

    #[test]
    fn test_delete_agent_drops_its_schedules() {
        let mut store = store();
        let pierre = store.create_agent(agent("Pierre")).unwrap();
        let sophie = store.create_agent(agent("Sophie")).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        store
            .add_schedule(DetailedScheduleEntry::recurring(
                pierre.id,
                start,
                t(7),
                t(15),
                Recurrence::daily(2),
            ))
            .unwrap();
        store
            .add_schedule(DetailedScheduleEntry::one_off(sophie.id, start, t(9), t(17)))
            .unwrap();
        assert_eq!(store.list_detailed_schedules().len(), 3);

        store.delete_agent(pierre.id).unwrap();
        let remaining = store.list_detailed_schedules();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].agent_id, sophie.id);
        assert!(matches!(store.delete_agent(pierre.id), Err(ColonyError::NotFound(_))));
    }

    #[test]
    fn test_update_and_delete_single_schedule_entry() {
        let mut store = store();
        let pierre = store.create_agent(agent("Pierre")).unwrap();
        let stored = store
            .add_schedule(DetailedScheduleEntry::recurring(
                pierre.id,
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                Recurrence::daily(3),
            ))
            .unwrap();
        let second = stored[1].id;

        let edited = store
            .update_schedule(second, |entry| {
                entry.agent_id = Uuid::new_v4();
                entry.notes = Some("Remplacement".to_string());
            })
            .unwrap();
        assert_eq!(edited.agent_id, pierre.id);
        assert_eq!(store.detailed_schedules_for(pierre.id)[1].notes.as_deref(), Some("Remplacement"));

        store.delete_schedule(second).unwrap();
        let left = store.detailed_schedules_for(pierre.id);
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|e| e.id != second));
        assert!(matches!(store.delete_schedule(second), Err(ColonyError::NotFound(_))));
    }

    #[test]
    fn test_building_lifecycle_publishes() {
        let mut store = store();
        let mut rx = store.notifier().subscribe();
        let building = Building {
            id: Uuid::new_v4(),
            name: "Bâtiment C".to_string(),
            description: String::new(),
            color: "#f59e0b".to_string(),
            created_at: Utc::now(),
            rooms: Vec::new(),
        };

        store.create_building(building.clone()).unwrap();
        let renamed = store
            .update_building(building.id, |b| b.name = "Bâtiment D".to_string())
            .unwrap();
        assert_eq!(renamed.name, "Bâtiment D");
        store.delete_building(building.id).unwrap();
        assert!(store.buildings.is_empty());

        for _ in 0..3 {
            assert_eq!(rx.try_recv().unwrap().collection, Collection::Buildings);
        }
    }

    #[test]
    fn test_delete_task_and_calendar_event() {
        let mut store = store();
        let task = store.create_task(task("Peinture")).unwrap();
        store.delete_task(task.id).unwrap();
        assert!(store.tasks.is_empty());
        assert!(store.delete_task(task.id).is_err());

        let event = CalendarEvent {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 7, 14).unwrap(),
            kind: crate::calendar::EventKind::Event,
            title: "Feu d'artifice".to_string(),
            description: String::new(),
            agent_id: None,
            child_count: Some(40),
        };
        store.create_calendar_event(event.clone()).unwrap();
        let moved = store
            .update_calendar_event(event.id, |e| e.date = NaiveDate::from_ymd_opt(2024, 7, 13).unwrap())
            .unwrap();
        assert_eq!(moved.date.to_string(), "2024-07-13");
        store.delete_calendar_event(event.id).unwrap();
        assert!(store.list_calendar_events().is_empty());
    }

    #[test]
    fn test_replace_settings_validates() {
        let mut store = store();
        let bad = FacilitySettings {
            camp_name: " ".to_string(),
            ..FacilitySettings::default()
        };
        assert!(store.replace_settings(bad).is_err());
        assert_eq!(store.settings, FacilitySettings::default());
    }
}
