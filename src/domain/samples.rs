use chrono::Utc;

use super::{Activity, Announcement};

pub(super) fn announcements() -> Vec<Announcement> {
    let now = Utc::now();
    vec![
        Announcement {
            id: 1,
            title: "Nevruz-i Sultani".to_string(),
            content: concat!(
                "<h3>NEVRUZ-İ SULTÂNÎ PROGRAMI</h3>",
                "<p>Nevruz-i Sultânî, Osmanlı İmparatorluğu'nda yılbaşı olarak kabul edilen ",
                "ve Sultan III. Murad tarafından resmi bayram ilan edilen önemli bir gündür.</p>",
                "<h4>Etkinlik Detayları:</h4>",
                "<ul><li>Tarih: 22 Mart Cumartesi</li><li>Saat: 15:30</li>",
                "<li>Yer: Bursa Mevlevîhanesi ve Müzesi</li></ul>",
            )
            .to_string(),
            date: "2025-03-22".to_string(),
            image: Some("/images/nevruz-main.jpg".to_string()),
            created_at: now,
            updated_at: now,
            is_active: true,
        },
        Announcement {
            id: 2,
            title: "Prof. Dr. Hüseyin Hatemi ile Söyleşi".to_string(),
            content: concat!(
                "<p>Prof. Dr. Hüseyin Hatemi ile gerçekleştirdiğimiz söyleşi serisini sizlerle buluşturuyoruz.</p>",
                "<ul><li>Tarih: 10 Nisan 2025</li>",
                "<li>Yer: Meveddet Derneği Konferans Salonu</li></ul>",
                "<p>Tüm üyelerimiz ve ilgilenenler davetlidir.</p>",
            )
            .to_string(),
            date: "2025-04-10".to_string(),
            image: Some("/images/hatemi-main.jpg".to_string()),
            created_at: now,
            updated_at: now,
            is_active: true,
        },
    ]
}

pub(super) fn activities() -> Vec<Activity> {
    let now = Utc::now();
    vec![
        Activity {
            id: 1,
            title: "Nevruz-i Sultani".to_string(),
            description: "Nevruz-i Sultânî, Osmanlı İmparatorluğu'nda yılbaşı olarak kabul edilen ve Sultan III. Murad tarafından resmi bayram ilan edilen önemli bir gündür.".to_string(),
            date: "2025-03-22".to_string(),
            location: Some("Bursa Mevlevîhanesi ve Müzesi".to_string()),
            images: vec!["/images/nevruz-main.jpg".to_string()],
            videos: Vec::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        },
        Activity {
            id: 2,
            title: "Prof. Dr. Hüseyin Hatemi ile Söyleşi".to_string(),
            description: "Prof. Dr. Hüseyin Hatemi ile gerçekleştirdiğimiz söyleşi serisini sizlerle buluşturuyoruz.".to_string(),
            date: "2025-04-10".to_string(),
            location: Some("Meveddet Derneği Konferans Salonu".to_string()),
            images: vec!["/images/hatemi-main.jpg".to_string()],
            videos: Vec::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        },
    ]
}
