use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::body::Bytes;
use meveddet::{
    config::{ReadFallback, Settings},
    domain::*,
    error::{AppError, Result},
    integrations::{Integration, IntegrationEvent, IntegrationManager},
    repository::{InMemoryStore, RecordStore},
    service::ServiceContext,
    storage::UploadedFile,
};

struct Fixture {
    context: ServiceContext,
    announcements: Arc<InMemoryStore<Announcement>>,
    activities: Arc<InMemoryStore<Activity>>,
    messages: Arc<InMemoryStore<ContactMessage>>,
    _root: tempfile::TempDir,
}

async fn fixture(fallback: ReadFallback, integrations: Vec<Arc<dyn Integration>>) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let mut settings = Settings::with_data_root(root.path());
    settings.storage.read_fallback = fallback;

    let manager = Arc::new(IntegrationManager::new());
    for integration in integrations {
        manager.register(integration).await;
    }

    let announcements = Arc::new(InMemoryStore::new());
    let activities = Arc::new(InMemoryStore::new());
    let messages = Arc::new(InMemoryStore::new());

    let context = ServiceContext::with_stores(
        &settings,
        announcements.clone(),
        activities.clone(),
        messages.clone(),
        manager,
    );

    Fixture {
        context,
        announcements,
        activities,
        messages,
        _root: root,
    }
}

fn new_announcement(title: &str) -> NewAnnouncement {
    NewAnnouncement {
        title: title.to_string(),
        content: "<p>Detaylar</p>".to_string(),
        date: "2025-05-10".to_string(),
        is_active: true,
    }
}

fn new_activity(title: &str) -> NewActivity {
    NewActivity {
        title: title.to_string(),
        description: "Açıklama".to_string(),
        date: "2025-06-01".to_string(),
        location: Some("Konya".to_string()),
        videos: vec!["https://www.youtube.com/watch?v=abc".to_string()],
        is_active: true,
    }
}

fn contact(name: &str, email: &str, message: &str) -> NewContactMessage {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "email": email,
        "subject": "Bilgi",
        "message": message,
    }))
    .unwrap()
}

fn image(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        data: Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"),
    }
}

#[derive(Default)]
struct RecordingIntegration {
    received: AtomicUsize,
}

#[async_trait]
impl Integration for RecordingIntegration {
    fn name(&self) -> &str {
        "recording"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn handle_event(&self, _event: &IntegrationEvent) -> Result<()> {
        self.received.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingIntegration;

#[async_trait]
impl Integration for FailingIntegration {
    fn name(&self) -> &str {
        "failing"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn health_check(&self) -> Result<()> {
        Err(AppError::Internal("smtp unreachable".to_string()))
    }

    async fn handle_event(&self, _event: &IntegrationEvent) -> Result<()> {
        Err(AppError::Internal("smtp unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_announcement_lifecycle() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let service = &f.context.announcement_service;

    let first = service.create(new_announcement("Bir"), None).await?;
    let second = service.create(new_announcement("İki"), None).await?;
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert!(first.image.is_none());

    let changes = AnnouncementChanges {
        title: Some("Bir (güncel)".to_string()),
        is_active: Some(false),
        ..Default::default()
    };
    let updated = service.update(1, changes, None).await?;
    assert_eq!(updated.id, 1);
    assert_eq!(updated.title, "Bir (güncel)");
    assert_eq!(updated.content, first.content);
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at >= first.updated_at);
    assert!(!updated.is_active);

    assert_eq!(service.list(false).await?.len(), 2);
    let active = service.list(true).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, 2);

    service.delete(2).await?;
    let third = service.create(new_announcement("Üç"), None).await?;
    // max + 1 over what is stored
    assert_eq!(third.id, 2);

    assert!(matches!(service.get(99).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete(99).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        service.update(99, AnnouncementChanges::default(), None).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_announcement_image_replacement() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let service = &f.context.announcement_service;
    let uploads = f.context.uploads.clone();

    let created = service.create(new_announcement("Afişli"), Some(image("afiş.jpg"))).await?;
    let first_path = created.image.clone().expect("image stored");
    assert!(first_path.starts_with("/uploads/"));
    let first_file = uploads.dir().join(first_path.trim_start_matches("/uploads/"));
    assert!(first_file.exists());

    let updated = service
        .update(created.id, AnnouncementChanges::default(), Some(image("yeni.png")))
        .await?;
    let second_path = updated.image.clone().expect("image replaced");
    assert_ne!(second_path, first_path);
    assert!(!first_file.exists());

    let cleared = service
        .update(
            created.id,
            AnnouncementChanges {
                remove_image: true,
                ..Default::default()
            },
            None,
        )
        .await?;
    assert!(cleared.image.is_none());

    Ok(())
}

#[tokio::test]
async fn test_activity_lifecycle() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let service = &f.context.activity_service;

    let created = service
        .create(new_activity("Gezi"), vec![image("a.jpg"), image("b.jpg")])
        .await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.images.len(), 2);
    assert_eq!(created.videos.len(), 1);

    let updated = service
        .update(
            1,
            ActivityChanges {
                location: Some(String::new()),
                videos: Some(vec![]),
                ..Default::default()
            },
            vec![],
        )
        .await?;
    assert!(updated.location.is_none());
    assert!(updated.videos.is_empty());
    assert_eq!(updated.images, created.images);
    assert_eq!(updated.created_at, created.created_at);

    service.delete(1).await?;
    assert!(f.activities.load().await?.is_empty());
    assert!(matches!(service.get(1).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_samples_fill_empty_listing_but_are_never_persisted() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Samples, vec![]).await;
    let service = &f.context.announcement_service;

    let listed = service.list(false).await?;
    let samples = Announcement::samples();
    assert!(!samples.is_empty());
    assert_eq!(
        listed.iter().map(|a| (a.id, a.title.as_str())).collect::<Vec<_>>(),
        samples.iter().map(|a| (a.id, a.title.as_str())).collect::<Vec<_>>()
    );
    assert!(f.announcements.load().await?.is_empty());

    let created = service.create(new_announcement("Gerçek"), None).await?;
    assert_eq!(created.id, 1);

    let listed = service.list(false).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Gerçek");
    assert_eq!(f.announcements.load().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_fallback_policies_for_unreadable_store() -> anyhow::Result<()> {
    let settings = Settings::default();
    let manager = Arc::new(IntegrationManager::new());

    for (fallback, expect) in [
        (ReadFallback::Samples, Some(Announcement::samples().len())),
        (ReadFallback::Empty, Some(0)),
        (ReadFallback::Error, None),
    ] {
        let mut settings = settings.clone();
        settings.storage.read_fallback = fallback;
        let context = ServiceContext::with_stores(
            &settings,
            Arc::new(InMemoryStore::<Announcement>::corrupted()),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            manager.clone(),
        );

        let listed = context.announcement_service.list(false).await;
        match expect {
            Some(len) => assert_eq!(listed?.len(), len),
            None => assert!(matches!(listed, Err(AppError::Corrupt(_)))),
        }

        // Writes never paper over an unreadable store
        let created = context
            .announcement_service
            .create(new_announcement("Yazılamaz"), None)
            .await;
        assert!(matches!(created, Err(AppError::Corrupt(_))));
    }

    Ok(())
}

#[tokio::test]
async fn test_contact_submission_notifies_integrations() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingIntegration::default());
    let f = fixture(ReadFallback::Samples, vec![recorder.clone()]).await;
    let service = &f.context.contact_service;

    // No sample contact messages exist
    assert!(service.list().await?.is_empty());

    let submission = service
        .submit(contact("  Ayşe  ", "ayse@example.com", "Merhaba"))
        .await?;
    assert_eq!(submission.message.id, MessageId::Number(1));
    assert_eq!(submission.message.name, "Ayşe");
    assert!(!submission.message.is_read);
    assert_eq!(submission.notifications.delivered, 1);
    assert_eq!(submission.notifications.failed, 0);
    assert_eq!(recorder.received.load(Ordering::SeqCst), 1);

    let second = service.submit(contact("Ali", "ali@example.com", "Selam")).await?;
    assert_eq!(second.message.id, MessageId::Number(2));
    assert_eq!(service.list().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_contact_notification_failure_keeps_message() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![Arc::new(FailingIntegration)]).await;
    let service = &f.context.contact_service;

    let submission = service.submit(contact("Ali", "ali@example.com", "Selam")).await?;
    assert_eq!(submission.notifications.delivered, 0);
    assert_eq!(submission.notifications.failed, 1);
    assert_eq!(f.messages.load().await?.len(), 1);

    let health = f.context.integration_manager.health_check_all().await;
    assert_eq!(health.len(), 1);
    assert!(health[0].1.is_err());

    Ok(())
}

#[tokio::test]
async fn test_invalid_contact_is_not_stored() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingIntegration::default());
    let f = fixture(ReadFallback::Empty, vec![recorder.clone()]).await;
    let service = &f.context.contact_service;

    for request in [
        contact("Ayşe", "", "Merhaba"),
        contact("Ayşe", "not-an-email", "Merhaba"),
        contact("   ", "ayse@example.com", "Merhaba"),
        contact("Ayşe", "ayse@example.com", "  "),
    ] {
        let err = service.submit(request).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    assert!(f.messages.load().await?.is_empty());
    assert_eq!(recorder.received.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_contact_mark_read_and_delete_with_legacy_ids() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let legacy = ContactMessage {
        id: MessageId::Text("1700000000000".to_string()),
        name: "Eski".to_string(),
        email: "eski@example.com".to_string(),
        subject: String::new(),
        message: "Eski mesaj".to_string(),
        created_at: chrono::Utc::now(),
        is_read: false,
    };
    f.messages.save(&[legacy]).await?;
    let service = &f.context.contact_service;

    let fresh = service.submit(contact("Yeni", "yeni@example.com", "Yeni mesaj")).await?;
    assert_eq!(fresh.message.id, MessageId::Number(1_700_000_000_001));

    let read = service.mark_read("1700000000000").await?;
    assert!(read.is_read);
    assert!(service.get("1700000000000").await?.is_read);

    let deleted = service.delete("1700000000001").await?;
    assert_eq!(deleted.name, "Yeni");
    assert_eq!(service.list().await?.len(), 1);

    assert!(matches!(service.mark_read("42").await, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete("nope").await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let service = f.context.announcement_service.clone();

    let mut handles = Vec::new();
    for i in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create(new_announcement(&format!("Duyuru {}", i)), None).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id);
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());

    Ok(())
}

#[tokio::test]
async fn test_sample_detail_is_readable_but_not_editable() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Samples, vec![]).await;
    let service = &f.context.announcement_service;
    let sample_id = Announcement::samples()[0].id;

    let shown = service.get(sample_id).await?;
    assert_eq!(shown.id, sample_id);

    let edit = service
        .update(sample_id, AnnouncementChanges::default(), None)
        .await;
    assert!(matches!(edit, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete(sample_id).await, Err(AppError::NotFound(_))));
    assert!(f.announcements.load().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_after_largest_id_fails_cleanly() -> anyhow::Result<()> {
    let f = fixture(ReadFallback::Empty, vec![]).await;
    let service = &f.context.announcement_service;

    let mut last = service.create(new_announcement("Son"), None).await?;
    last.id = i64::MAX;
    f.announcements.save(&[last]).await?;

    let err = service
        .create(new_announcement("Taşma"), Some(image("taşma.jpg")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Corrupt(_)));
    assert_eq!(f.announcements.load().await?.len(), 1);
    // The image is never written when no id is available
    assert!(!f.context.uploads.dir().exists());

    let legacy = ContactMessage {
        id: MessageId::Text(i64::MAX.to_string()),
        name: "Eski".to_string(),
        email: "eski@example.com".to_string(),
        subject: String::new(),
        message: "Eski mesaj".to_string(),
        created_at: chrono::Utc::now(),
        is_read: false,
    };
    f.messages.save(&[legacy]).await?;
    let err = f
        .context
        .contact_service
        .submit(contact("Yeni", "yeni@example.com", "Merhaba"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Corrupt(_)));
    assert_eq!(f.messages.load().await?.len(), 1);

    Ok(())
}
