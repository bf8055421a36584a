use custodian_application::AuthorizationFacade;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub facade: AuthorizationFacade,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
