use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::Config;

use helpdesk_core::types::{Contact, ContactStatus, Conversation, ConversationStatus, ConversationUser};
use helpdesk_filter::{filter_and_sort, ContactFilter, ContactQuery, ContactSort, InboxFilter, InboxQuery, InboxSort, SortKey};

const TAGS: [&str; 4] = ["VIP", "Tech", "Design", "Lead"];

fn status() -> impl Strategy<Value = ContactStatus> {
    prop_oneof![Just(ContactStatus::Active), Just(ContactStatus::Inactive), Just(ContactStatus::Pending)]
}

fn filter() -> impl Strategy<Value = ContactFilter> {
    prop_oneof![
        Just(ContactFilter::All),
        Just(ContactFilter::Starred),
        Just(ContactFilter::Active),
        Just(ContactFilter::Inactive),
        Just(ContactFilter::Pending),
    ]
}

fn sort() -> impl Strategy<Value = ContactSort> {
    prop_oneof![
        Just(ContactSort::Name),
        Just(ContactSort::Company),
        Just(ContactSort::LastContact),
        Just(ContactSort::Interactions),
        Just(ContactSort::Natural),
    ]
}

fn contacts() -> impl Strategy<Value = Vec<Contact>> {
    prop::collection::vec(
        ("[A-Za-z]{1,6}", "[a-c]{1,3}", any::<bool>(), status(), 0_u32..5, 0_u32..40, prop::sample::subsequence(TAGS.to_vec(), 0..3)),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, company, is_starred, status, interactions, day, tags))| Contact {
                id: i.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                name,
                phone: String::new(),
                company,
                role: String::new(),
                location: String::new(),
                avatar: String::new(),
                is_starred,
                last_contact: String::new(),
                status,
                tags: tags.into_iter().map(str::to_string).collect(),
                notes: None,
                social_links: None,
                interactions,
                added_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date") + chrono::Days::new(u64::from(day)),
            })
            .collect()
    })
}

fn inbox_sort() -> impl Strategy<Value = InboxSort> {
    prop_oneof![Just(InboxSort::Natural), Just(InboxSort::Subject), Just(InboxSort::Sender)]
}

fn conversations() -> impl Strategy<Value = Vec<Conversation>> {
    prop::collection::vec(("[A-Ca-c]{1,3}", "[A-Ca-c]{1,3}"), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (sender, subject))| Conversation {
                id: i.to_string(),
                user: ConversationUser { name: sender, email: String::new() },
                subject,
                preview: String::new(),
                timestamp: String::new(),
                status: ConversationStatus::Open,
                is_unread: false,
                is_starred: false,
                assignee: None,
                ai_suggestion: None,
                tags: Vec::new(),
            })
            .collect()
    })
}

/// `out` holds exactly the records of `input`, ordered by `key`, with ties
/// left in input order. Records carry their input position as id.
fn assert_stable_permutation<R, K>(input: &[R], out: &[R], key: &K, id: impl Fn(&R) -> usize) -> Result<(), TestCaseError>
where
    K: SortKey<R>,
{
    prop_assert_eq!(out.len(), input.len());
    let mut ids: Vec<usize> = out.iter().map(&id).collect();
    ids.sort_unstable();
    prop_assert_eq!(ids, (0..input.len()).collect::<Vec<_>>());
    for pair in out.windows(2) {
        match key.compare(&pair[0], &pair[1]) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => prop_assert!(id(&pair[0]) < id(&pair[1])),
            std::cmp::Ordering::Greater => prop_assert!(false, "records out of order"),
        }
    }
    Ok(())
}

fn position(id: &str) -> usize {
    id.parse().expect("numeric id")
}

fn query() -> impl Strategy<Value = ContactQuery> {
    ("[a-c]{0,2}", filter(), sort(), prop::sample::subsequence(TAGS.to_vec(), 0..2))
        .prop_map(|(text, category, sort, tags)| ContactQuery::new(category, sort).with_text(text).with_tags(tags))
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn applying_twice_changes_nothing(records in contacts(), q in query()) {
        let once = filter_and_sort(&records, &q);
        let twice = filter_and_sort(&once, &q);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_query_with_natural_order_is_identity(records in contacts()) {
        let q = ContactQuery::new(ContactFilter::All, ContactSort::Natural);
        prop_assert_eq!(filter_and_sort(&records, &q), records);
    }

    #[test]
    fn empty_query_keeps_every_contact_in_sorted_order(records in contacts(), key in sort()) {
        let out = filter_and_sort(&records, &ContactQuery::new(ContactFilter::All, key));
        assert_stable_permutation(&records, &out, &key, |c| position(&c.id))?;
    }

    #[test]
    fn empty_query_keeps_every_conversation_in_sorted_order(records in conversations(), key in inbox_sort()) {
        let out = filter_and_sort(&records, &InboxQuery::new(InboxFilter::default(), key));
        assert_stable_permutation(&records, &out, &key, |c| position(&c.id))?;
    }

    #[test]
    fn restrictions_compose_as_intersection(records in contacts(), q in query()) {
        let natural = |q: ContactQuery| ContactQuery { sort: ContactSort::Natural, ..q };
        let combined = filter_and_sort(&records, &natural(q.clone()));

        let text_only = ContactQuery::new(ContactFilter::All, ContactSort::Natural).with_text(q.text.clone());
        let category_only = ContactQuery::new(q.category, ContactSort::Natural);
        let tags_only = ContactQuery { tags: q.tags.clone(), ..ContactQuery::new(ContactFilter::All, ContactSort::Natural) };

        let chained = filter_and_sort(&filter_and_sort(&filter_and_sort(&records, &tags_only), &category_only), &text_only);
        prop_assert_eq!(combined, chained);
    }

    #[test]
    fn filtered_output_stays_sorted_and_stable(records in contacts(), q in query()) {
        let out = filter_and_sort(&records, &q);
        for pair in out.windows(2) {
            match q.sort.compare(&pair[0], &pair[1]) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => prop_assert!(position(&pair[0].id) < position(&pair[1].id)),
                std::cmp::Ordering::Greater => prop_assert!(false, "records out of order"),
            }
        }
    }

    #[test]
    fn output_is_a_subset_of_input(records in contacts(), q in query()) {
        let out = filter_and_sort(&records, &q);
        prop_assert!(out.len() <= records.len());
        for c in &out {
            prop_assert!(records.contains(c));
        }
    }
}
