//! Deterministic customer identities for sample data: name, email, phone.
//! Same RNG seed, same people.

use crate::rng::SampleRng;

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Amelia", "Noah", "Ava", "Oliver", "Sophia", "Elijah",
    "Isabella", "Lucas", "Mia", "Mateo", "Charlotte", "Levi", "Harper", "Ezra",
    "Evelyn", "Asher", "Luna", "Leo", "Camila", "James", "Gianna", "Aiden",
    "Priya", "Arjun", "Mei", "Hiroshi", "Fatima", "Omar", "Zara", "Kwame",
    "Ingrid", "Sven", "Chloe", "Mason", "Nora", "Theo", "Ruby", "Felix",
];

const LAST_NAMES: &[&str] = &[
    "Nguyen", "Patel", "Smith", "Garcia", "Okafor", "Kowalski", "Tremblay", "Roy",
    "Gagnon", "Martin", "Chen", "Singh", "Brown", "Wilson", "Leblanc", "Campbell",
    "MacDonald", "Kim", "Silva", "Haddad", "Novak", "Andersen", "Murphy", "Rossi",
    "Yamamoto", "Fischer", "Dubois", "Cohen", "Mensah", "Ortiz", "Walsh", "Lambert",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "mail.example.org", "inbox.example.net",
];

const AREA_CODES: &[&str] = &["416", "647", "604", "514", "403", "613"];

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut SampleRng) -> String {
        let first = rng.pick(FIRST_NAMES);
        let last = rng.pick(LAST_NAMES);
        format!("{first} {last}")
    }

    /// `first.last<n>@domain`, lower-cased.
    pub fn email_for(name: &str, rng: &mut SampleRng) -> String {
        let local = name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        let suffix = rng.next_u64_below(100);
        let domain = rng.pick(EMAIL_DOMAINS);
        format!("{local}{suffix}@{domain}")
    }

    /// North American style `AAA-555-NNNN`.
    pub fn phone(rng: &mut SampleRng) -> String {
        let area = rng.pick(AREA_CODES);
        format!("{area}-555-{:04}", rng.next_u64_below(10_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SampleStream;

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = SampleRng::new(12345, SampleStream::Identity);
        let mut rng2 = SampleRng::new(12345, SampleStream::Identity);

        assert_eq!(
            NameGenerator::full_name(&mut rng1),
            NameGenerator::full_name(&mut rng2),
            "Same seed should produce same name"
        );
    }

    #[test]
    fn generates_two_part_names_and_matching_emails() {
        let mut rng = SampleRng::new(12345, SampleStream::Identity);

        for _ in 0..100 {
            let name = NameGenerator::full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {name}");

            let email = NameGenerator::email_for(&name, &mut rng);
            assert!(
                email.starts_with(&parts[0].to_lowercase()),
                "Email {email} should start with the first name of {name}"
            );
            assert!(email.contains('@'));
        }
    }

    #[test]
    fn phones_have_fixed_shape() {
        let mut rng = SampleRng::new(9, SampleStream::Contact);
        for _ in 0..20 {
            let phone = NameGenerator::phone(&mut rng);
            assert_eq!(phone.len(), 12, "Unexpected phone shape: {phone}");
            assert_eq!(&phone[3..8], "-555-");
        }
    }
}
