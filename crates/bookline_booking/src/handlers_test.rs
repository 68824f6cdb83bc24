#[cfg(test)]
mod tests {
    use crate::handlers::{book_handler, unavailable_times_handler, BookingState};
    use crate::logic::{BookingRequest, UnavailableTimesQuery};
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::Json;
    use bookline_common::services::{
        BookingRecord, BookingRepository, BoxFuture, BoxedError, NewBooking, NotificationResult,
        NotificationService,
    };
    use bookline_config::{AppConfig, BookingConfig, MailerConfig, ServerConfig};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    /// Booking repository backed by a Vec, for exercising the handlers
    /// without a database.
    #[derive(Default)]
    struct InMemoryRepository {
        bookings: Mutex<Vec<BookingRecord>>,
        fail: bool,
    }

    impl BookingRepository for InMemoryRepository {
        type Error = BoxedError;

        fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, BookingRecord, Self::Error> {
            Box::pin(async move {
                if self.fail {
                    return Err(BoxedError("storage offline".into()));
                }
                let mut bookings = self.bookings.lock().unwrap();
                let record = BookingRecord {
                    id: Some(format!("bk-{}", bookings.len() + 1)),
                    name: booking.name,
                    email: booking.email,
                    number: booking.number,
                    address: booking.address,
                    message: booking.message,
                    service: booking.service,
                    addition_service: booking.addition_service,
                    start_time: booking.start_time,
                };
                bookings.push(record.clone());
                Ok(record)
            })
        }

        fn find_by_time_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BookingRecord>, Self::Error> {
            Box::pin(async move {
                if self.fail {
                    return Err(BoxedError("storage offline".into()));
                }
                Ok(self
                    .bookings
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|b| b.start_time >= start && b.start_time < end)
                    .cloned()
                    .collect())
            })
        }
    }

    /// Notification service that records every email instead of sending it.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    impl NotificationService for RecordingNotifier {
        type Error = BoxedError;

        fn send_email(
            &self,
            to: &str,
            subject: &str,
            body: &str,
        ) -> BoxFuture<'_, NotificationResult, Self::Error> {
            let to = to.to_string();
            let subject = subject.to_string();
            let body = body.to_string();
            Box::pin(async move {
                if self.fail {
                    return Err(BoxedError("mail provider offline".into()));
                }
                self.sent.lock().unwrap().push((to, subject, body));
                Ok(NotificationResult {
                    id: "msg-1".to_string(),
                    status: "sent".to_string(),
                })
            })
        }
    }

    fn test_config(use_mailer: bool) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            use_mailer,
            database: None,
            mailer: use_mailer.then(|| MailerConfig {
                api_url: "https://mail.invalid/v1/messages".to_string(),
                api_key: "test-key".to_string(),
                from_address: "noreply@example.test".to_string(),
                notify_address: "owner@example.test".to_string(),
            }),
            booking: Some(BookingConfig {
                time_zone: Some("America/Edmonton".to_string()),
                slot_width_minutes: None,
                slots_per_booking: None,
            }),
            cors: None,
        })
    }

    fn test_state(
        repo: &Arc<InMemoryRepository>,
        notifier: Option<&Arc<RecordingNotifier>>,
    ) -> Arc<BookingState> {
        let repository: Arc<dyn BookingRepository<Error = BoxedError>> = repo.clone();
        let notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>> =
            notifier.map(|n| {
                let service: Arc<dyn NotificationService<Error = BoxedError>> = n.clone();
                service
            });
        Arc::new(BookingState {
            config: test_config(notifier.is_some()),
            repository,
            notifier,
        })
    }

    fn booking_payload(date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            name: "Jordan Doe".to_string(),
            email: "jordan@example.com".to_string(),
            number: "+15550001111".to_string(),
            address: "12 Main St".to_string(),
            message: None,
            service: "Bridal".to_string(),
            addition_service: Some("Lashes".to_string()),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    fn record_at(start_time: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            id: Some("bk-0".to_string()),
            name: "Jordan Doe".to_string(),
            email: "jordan@example.com".to_string(),
            number: "+15550001111".to_string(),
            address: "12 Main St".to_string(),
            message: None,
            service: "Bridal".to_string(),
            addition_service: None,
            start_time,
        }
    }

    #[tokio::test]
    async fn valid_booking_is_persisted_and_notified() {
        let repo = Arc::new(InMemoryRepository::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = test_state(&repo, Some(&notifier));

        let response = book_handler(
            State(state),
            Json(booking_payload("2024-06-07", "10:00")),
        )
        .await
        .expect("booking should succeed")
        .0;
        assert!(response.success);
        assert!(response.booking_id.is_some());

        // 10:00 in Edmonton during June is 16:00 UTC
        let stored = repo.bookings.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0].start_time,
            Utc.with_ymd_and_hms(2024, 6, 7, 16, 0, 0).unwrap()
        );

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "owner@example.test");
        assert_eq!(subject, "New Booking: Bridal");
        assert!(body.contains("Date: 2024-06-07"));
        assert!(body.contains("Time: 10:00"));
        assert!(body.contains("Additional Service: Lashes"));
    }

    #[tokio::test]
    async fn invalid_time_is_rejected_before_any_side_effect() {
        let repo = Arc::new(InMemoryRepository::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = test_state(&repo, Some(&notifier));

        let err = book_handler(
            State(state),
            Json(booking_payload("2024-02-30", "10:00")),
        )
        .await
        .err()
        .expect("booking should be rejected");
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        assert!(repo.bookings.lock().unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_reports_error_but_keeps_booking() {
        let repo = Arc::new(InMemoryRepository::default());
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let state = test_state(&repo, Some(&notifier));

        let err = book_handler(
            State(state),
            Json(booking_payload("2024-06-07", "10:00")),
        )
        .await
        .err()
        .expect("email failure should surface");
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);

        // The booking was saved before the email was attempted
        assert_eq!(repo.bookings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn booking_succeeds_without_a_notifier() {
        let repo = Arc::new(InMemoryRepository::default());
        let state = test_state(&repo, None);

        let response = book_handler(
            State(state),
            Json(booking_payload("2024-06-07", "10:00")),
        )
        .await
        .expect("booking should succeed")
        .0;
        assert!(response.success);
        assert_eq!(repo.bookings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn storage_failure_on_submission_is_a_server_error() {
        let repo = Arc::new(InMemoryRepository {
            fail: true,
            ..Default::default()
        });
        let state = test_state(&repo, None);

        let err = book_handler(
            State(state),
            Json(booking_payload("2024-06-07", "10:00")),
        )
        .await
        .err()
        .expect("storage failure should surface");
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unavailable_times_lists_blocked_labels_for_the_day() {
        let repo = Arc::new(InMemoryRepository::default());
        // One booking on the queried day, one on the next day
        repo.bookings
            .lock()
            .unwrap()
            .push(record_at(Utc.with_ymd_and_hms(2024, 6, 7, 16, 0, 0).unwrap()));
        repo.bookings
            .lock()
            .unwrap()
            .push(record_at(Utc.with_ymd_and_hms(2024, 6, 8, 16, 0, 0).unwrap()));
        let state = test_state(&repo, None);

        let Json(labels) = unavailable_times_handler(
            State(state),
            Query(UnavailableTimesQuery {
                date: "2024-06-07".to_string(),
            }),
        )
        .await
        .map_err(|e| e.status())
        .expect("query should succeed");

        assert_eq!(labels, ["10:00", "10:30", "11:00", "11:30", "12:00"]);
    }

    #[tokio::test]
    async fn unavailable_times_is_empty_for_a_free_day() {
        let repo = Arc::new(InMemoryRepository::default());
        let state = test_state(&repo, None);

        let Json(labels) = unavailable_times_handler(
            State(state),
            Query(UnavailableTimesQuery {
                date: "2024-06-07".to_string(),
            }),
        )
        .await
        .map_err(|e| e.status())
        .expect("query should succeed");

        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn unavailable_times_rejects_malformed_dates() {
        let repo = Arc::new(InMemoryRepository::default());
        let state = test_state(&repo, None);

        let err = unavailable_times_handler(
            State(state),
            Query(UnavailableTimesQuery {
                date: "June 7th".to_string(),
            }),
        )
        .await
        .err()
        .expect("query should be rejected");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_times_storage_failure_is_a_server_error() {
        let repo = Arc::new(InMemoryRepository {
            fail: true,
            ..Default::default()
        });
        let state = test_state(&repo, None);

        let err = unavailable_times_handler(
            State(state),
            Query(UnavailableTimesQuery {
                date: "2024-06-07".to_string(),
            }),
        )
        .await
        .err()
        .expect("storage failure should surface");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
