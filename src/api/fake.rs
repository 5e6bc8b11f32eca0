//! In-process stand-in for the registration service.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use async_trait::async_trait;

use crate::{
    api::{ApiError, HealthStatus, PortalApi},
    models::{
        area::{Area, AreaCount},
        persona::{CreatedPersona, NewPersona, Persona},
    },
};

/// Scripted responses plus a record of every request received
pub struct FakePortalApi {
    areas: Result<Vec<Area>, ApiError>,
    counts: RefCell<VecDeque<Result<Vec<AreaCount>, ApiError>>>,
    create_failure: Option<ApiError>,
    created_body: Option<CreatedPersona>,
    personas: Vec<Persona>,
    created: RefCell<Vec<NewPersona>>,
    count_calls: Cell<usize>,
}

impl Default for FakePortalApi {
    fn default() -> Self {
        Self {
            areas: Ok(vec![
                area(1, "Ventas"),
                area(2, "Marketing"),
                area(3, "TI"),
            ]),
            counts: RefCell::new(VecDeque::new()),
            create_failure: None,
            created_body: None,
            personas: vec![],
            created: RefCell::new(vec![]),
            count_calls: Cell::new(0),
        }
    }
}

pub fn area(id: u64, name: &str) -> Area {
    Area {
        id,
        name: name.to_string(),
    }
}

pub fn area_count(id: u64, name: &str, person_count: u64) -> AreaCount {
    AreaCount {
        id,
        name: name.to_string(),
        description: format!("Área de {}", name.to_lowercase()),
        person_count,
    }
}

impl FakePortalApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_areas(mut self, areas: Result<Vec<Area>, ApiError>) -> Self {
        self.areas = areas;
        self
    }

    /// Queues the response for the next `area_counts` call
    pub fn then_counts(self, counts: Result<Vec<AreaCount>, ApiError>) -> Self {
        self.counts.borrow_mut().push_back(counts);
        self
    }

    pub fn failing_create(mut self, error: ApiError) -> Self {
        self.create_failure = Some(error);
        self
    }

    /// Answers creates with `body` instead of echoing the request
    pub fn answering_create(mut self, body: CreatedPersona) -> Self {
        self.created_body = Some(body);
        self
    }

    pub fn with_personas(mut self, personas: Vec<Persona>) -> Self {
        self.personas = personas;
        self
    }

    pub fn created(&self) -> Vec<NewPersona> {
        self.created.borrow().clone()
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.get()
    }
}

#[async_trait(?Send)]
impl PortalApi for FakePortalApi {
    async fn list_areas(&self) -> Result<Vec<Area>, ApiError> {
        self.areas.clone()
    }

    async fn area_counts(&self) -> Result<Vec<AreaCount>, ApiError> {
        self.count_calls.set(self.count_calls.get() + 1);
        self.counts
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport(String::from("no scripted response"))))
    }

    async fn create_persona(&self, persona: &NewPersona) -> Result<CreatedPersona, ApiError> {
        self.created.borrow_mut().push(persona.clone());
        if let Some(error) = &self.create_failure {
            return Err(error.clone());
        }
        if let Some(body) = &self.created_body {
            return Ok(body.clone());
        }
        let id = self.created.borrow().len() as u64;
        Ok(CreatedPersona {
            message: Some(String::from("Persona registrada exitosamente")),
            data: Some(Persona {
                id,
                name: persona.name.clone(),
                email: persona.email.clone(),
                area_id: persona.area_id,
            }),
        })
    }

    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        Ok(self.personas.clone())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: String::from("ok"),
            service: Some(String::from("backend-monolito")),
        })
    }
}
