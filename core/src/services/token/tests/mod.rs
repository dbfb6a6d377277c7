//! Unit tests for the token service


use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::repositories::{MockTokenRepository, MockUserDirectory};
use crate::services::token::{RefreshOutcome, TokenService, TokenServiceConfig};

type TestService = TokenService<MockTokenRepository, MockUserDirectory>;

/// Builds a service over shared mock handles, with one known user
async fn create_test_service() -> (TestService, MockTokenRepository, MockUserDirectory, User) {
    let repository = MockTokenRepository::new();
    let directory = MockUserDirectory::new();

    let user = User::new(Uuid::new_v4())
        .with_username("alice")
        .with_email("alice@example.com")
        .with_roles(vec!["member".to_string()]);
    directory.insert(user.clone()).await;

    let service = TokenService::new(
        repository.clone(),
        directory.clone(),
        TokenServiceConfig::default(),
    )
    .expect("failed to create token service");

    (service, repository, directory, user)
}

fn expect_granted(outcome: RefreshOutcome) -> TokenPair {
    match outcome {
        RefreshOutcome::Granted(pair) => pair,
        RefreshOutcome::Rejected => panic!("expected refresh to be granted"),
    }
}
