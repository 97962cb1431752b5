//! Fixture data loaded at startup

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Client, Message, Plan, Reaction, Sender};

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn clients() -> Vec<Client> {
    vec![
        Client::empty("C1-74999", day(2023, 2, 23))
            .with_name("Mariana Costa")
            .with_email("mariana.costa@example.com")
            .with_phone("+1 555 0142")
            .with_address("18 Harbor Lane, Portland, OR")
            .with_plan(Plan::Premium),
        Client::empty("C1-81678", day(2022, 10, 20))
            .with_name("Julian Brandt")
            .with_email("j.brandt@example.com")
            .with_phone("+1 555 0187")
            .with_address("402 Elm Street, Austin, TX")
            .with_plan(Plan::Pro),
        Client::empty("C1-35120", day(2023, 7, 11))
            .with_name("Aiko Tanaka")
            .with_email("aiko.tanaka@example.com")
            .with_phone("+1 555 0119")
            .with_address("77 Sunset Blvd, Los Angeles, CA")
            .with_plan(Plan::Enterprise),
        Client::empty("C1-52806", day(2021, 5, 3))
            .with_name("Omar Haddad")
            .with_email("omar.haddad@example.com")
            .with_phone("+1 555 0160")
            .with_address("9 Birch Court, Denver, CO"),
    ]
}

pub fn messages() -> Vec<Message> {
    let message = |id: &str,
                   client_id: &str,
                   content: &str,
                   created_at: DateTime<Utc>,
                   sender: Sender,
                   like: Reaction| Message {
        id: id.to_string(),
        client_id: client_id.to_string(),
        content: content.to_string(),
        created_at,
        sender,
        like,
    };

    vec![
        message(
            "M1-20481",
            "C1-74999",
            "Hi, my invoice shows the premium plan twice this month.",
            at(2024, 5, 14, 9, 12),
            Sender::Client,
            Reaction::Neutral,
        ),
        message(
            "M1-20482",
            "C1-74999",
            "Sorry about that! I can see the duplicate charge and have refunded it.",
            at(2024, 5, 14, 9, 15),
            Sender::Agent,
            Reaction::Liked,
        ),
        message(
            "M1-20483",
            "C1-74999",
            "Great, thank you.",
            at(2024, 5, 14, 9, 16),
            Sender::Client,
            Reaction::Neutral,
        ),
        message(
            "M1-31907",
            "C1-81678",
            "Can I move my team to the enterprise plan mid-cycle?",
            at(2024, 5, 12, 16, 40),
            Sender::Client,
            Reaction::Neutral,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let clients: HashSet<_> = clients().into_iter().map(|c| c.id).collect();
        assert_eq!(clients.len(), 4);
        let messages: HashSet<_> = messages().into_iter().map(|m| m.id).collect();
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_seed_dates() {
        let all = clients();
        let find = |id: &str| all.iter().find(|c| c.id == id).unwrap().member_since;
        assert_eq!(find("C1-74999"), day(2023, 2, 23));
        assert_eq!(find("C1-81678"), day(2022, 10, 20));
    }
}
