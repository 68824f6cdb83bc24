// --- File: crates/services/bookline_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module wires the concrete persistence and notification
//! implementations to the service seams the booking routes consume.

use bookline_common::logging::log_result;
use bookline_common::services::{
    BookingRepository, BoxFuture, BoxedError, NotificationResult, NotificationService,
    ServiceFactory,
};
use bookline_common::{is_feature_enabled, BooklineError, Context};
use bookline_config::AppConfig;
use bookline_db::{DbClient, SqlBookingRepository};
use bookline_mailer::MailerNotificationService;
use std::sync::Arc;
use tracing::info;

/// Adapter that erases a notification service's concrete error type so the
/// service can be stored behind the `BoxedError` trait object the handlers
/// expect.
struct BoxedNotificationService<S>(S);

impl<S: NotificationService> NotificationService for BoxedNotificationService<S> {
    type Error = BoxedError;

    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let fut = self.0.send_email(to, subject, body);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// Service factory for the backend binary.
///
/// Initializes the collaborators once at startup, based on the application
/// configuration and runtime flags, and hands them out as trait objects.
pub struct BooklineServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    booking_repository: Option<Arc<dyn BookingRepository<Error = BoxedError>>>,
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

impl BooklineServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, BooklineError> {
        info!("Initializing booking repository...");
        let db_client = DbClient::new(&config)
            .await
            .context("Failed to connect to database")?;
        if db_client.is_healthy().await {
            info!("Connected to database");
        }
        let repository = SqlBookingRepository::new(db_client);
        log_result(
            repository.init_schema().await,
            "Booking schema ready",
            "Failed to initialize booking schema",
        )
        .context("Failed to initialize booking schema")?;

        let booking_repository: Arc<dyn BookingRepository<Error = BoxedError>> =
            Arc::new(repository);

        let notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>> =
            if is_feature_enabled(&config, config.use_mailer, config.mailer.as_ref()) {
                info!("Initializing mailer notification service...");
                Some(Arc::new(BoxedNotificationService(
                    MailerNotificationService::new(config.clone()),
                )))
            } else {
                info!("Mailer is disabled; bookings will not send notifications.");
                None
            };

        Ok(Self {
            config,
            booking_repository: Some(booking_repository),
            notification_service,
        })
    }
}

impl ServiceFactory for BooklineServiceFactory {
    fn booking_repository(&self) -> Option<Arc<dyn BookingRepository<Error = BoxedError>>> {
        self.booking_repository.clone()
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        self.notification_service.clone()
    }
}
