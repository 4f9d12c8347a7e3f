use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::donations::{dtos as donations_dtos, handlers as donations_handlers};
use crate::features::events::{dtos as events_dtos, handlers as events_handlers};
use crate::features::milestones::{dtos as milestones_dtos, handlers as milestones_handlers};
use crate::features::participants::{dtos as participants_dtos, handlers as participants_handlers};
use crate::features::registrations::{
    dtos as registrations_dtos, handlers as registrations_handlers,
};
use crate::features::surveys::{dtos as surveys_dtos, handlers as surveys_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::me,
        // Participants (admin)
        participants_handlers::list,
        participants_handlers::add,
        participants_handlers::update_role,
        participants_handlers::delete,
        // Donations
        donations_handlers::list,
        donations_handlers::create,
        // Milestones
        milestones_handlers::list,
        milestones_handlers::create,
        milestones_handlers::update,
        milestones_handlers::delete,
        // Surveys
        surveys_handlers::list,
        surveys_handlers::create,
        // Events
        events_handlers::list,
        events_handlers::create_template,
        events_handlers::create_occurrence,
        events_handlers::update_occurrence,
        events_handlers::delete_occurrence,
        // Registrations
        registrations_handlers::list,
        registrations_handlers::create,
        registrations_handlers::check_in,
        registrations_handlers::cancel,
        // Dashboard (admin)
        dashboard_handlers::donations_total,
        dashboard_handlers::milestones_by_category,
        dashboard_handlers::participants_by_interest,
        dashboard_handlers::surveys_nps,
    ),
    components(
        schemas(
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthTokenDto,
            ApiResponse<auth_dtos::AuthTokenDto>,
            // Participants
            participants_dtos::ParticipantDto,
            participants_dtos::ParticipantFiltersDto,
            participants_dtos::ParticipantListDto,
            participants_dtos::AddParticipantDto,
            participants_dtos::UpdateRoleDto,
            ApiResponse<participants_dtos::ParticipantDto>,
            ApiResponse<participants_dtos::ParticipantListDto>,
            // Donations
            donations_dtos::DonationDto,
            donations_dtos::DonationFiltersDto,
            donations_dtos::DonationAggregatesDto,
            donations_dtos::DonationListDto,
            donations_dtos::CreateDonationDto,
            ApiResponse<donations_dtos::DonationDto>,
            ApiResponse<donations_dtos::DonationListDto>,
            // Milestones
            milestones_dtos::MilestoneDto,
            milestones_dtos::MilestoneFiltersDto,
            milestones_dtos::MilestoneListDto,
            milestones_dtos::CreateMilestoneDto,
            milestones_dtos::UpdateMilestoneDto,
            ApiResponse<milestones_dtos::MilestoneDto>,
            ApiResponse<milestones_dtos::MilestoneListDto>,
            // Surveys
            surveys_dtos::SurveyDto,
            surveys_dtos::SurveyFiltersDto,
            surveys_dtos::SurveyAggregatesDto,
            surveys_dtos::SurveyListDto,
            surveys_dtos::CreateSurveyDto,
            ApiResponse<surveys_dtos::SurveyDto>,
            ApiResponse<surveys_dtos::SurveyListDto>,
            // Events
            events_dtos::EventTemplateDto,
            events_dtos::OccurrenceDto,
            events_dtos::CreateTemplateDto,
            events_dtos::CreateOccurrenceDto,
            events_dtos::UpdateOccurrenceDto,
            ApiResponse<events_dtos::EventTemplateDto>,
            ApiResponse<events_dtos::OccurrenceDto>,
            ApiResponse<Vec<events_dtos::OccurrenceDto>>,
            // Registrations
            registrations_dtos::RegistrationDto,
            registrations_dtos::CreateRegistrationDto,
            ApiResponse<registrations_dtos::RegistrationDto>,
            ApiResponse<Vec<registrations_dtos::RegistrationDto>>,
            // Dashboard
            dashboard_dtos::DonationsTotalDto,
            dashboard_dtos::CategoryCountDto,
            dashboard_dtos::EventNpsDto,
            ApiResponse<dashboard_dtos::DonationsTotalDto>,
            ApiResponse<Vec<dashboard_dtos::CategoryCountDto>>,
            ApiResponse<Vec<dashboard_dtos::EventNpsDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, and identity"),
        (name = "participants", description = "Participant directory (admin only)"),
        (name = "donations", description = "Donations and donor records"),
        (name = "milestones", description = "Participant milestones"),
        (name = "surveys", description = "Post-event surveys and NPS scoring"),
        (name = "events", description = "Event templates and occurrences"),
        (name = "registrations", description = "Event registrations and check-in"),
        (name = "dashboard", description = "Admin dashboard aggregates"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Ella Rises API",
        version = "0.1.0",
        description = "Program administration API for the Ella Rises nonprofit",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
