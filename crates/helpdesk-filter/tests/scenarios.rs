use helpdesk_core::seed;
use helpdesk_core::types::{Contact, Conversation};
use helpdesk_filter::contacts::contact_stats;
use helpdesk_filter::facets::all_tags;
use helpdesk_filter::{filter_and_sort, ContactFilter, ContactQuery, ContactSort, InboxFilter, InboxQuery, InboxSort};

fn contact_ids(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|c| c.id.as_str()).collect()
}

fn conversation_ids(conversations: &[Conversation]) -> Vec<&str> {
    conversations.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn contact_text_search_spans_name_and_email() {
    let contacts = seed::contacts().expect("contacts");
    let q = ContactQuery::new(ContactFilter::All, ContactSort::Natural);

    let out = filter_and_sort(&contacts, &q.clone().with_text("john doe"));
    assert_eq!(contact_ids(&out), vec!["1"]);

    // "john" is also a substring of "Alice Johnson".
    let out = filter_and_sort(&contacts, &q.clone().with_text("JOHN"));
    assert_eq!(contact_ids(&out), vec!["1", "2"]);

    let out = filter_and_sort(&contacts, &q.with_text("consultant"));
    assert_eq!(contact_ids(&out), vec!["4"]);
}

#[test]
fn starred_category_keeps_flagged_contacts() {
    let contacts = seed::contacts().expect("contacts");
    let out = filter_and_sort(&contacts, &ContactQuery::new(ContactFilter::Starred, ContactSort::Natural));
    assert_eq!(contact_ids(&out), vec!["1", "3", "5"]);
}

#[test]
fn contact_sorts() {
    let contacts = seed::contacts().expect("contacts");
    let sorted = |sort: ContactSort| {
        let out = filter_and_sort(&contacts, &ContactQuery::new(ContactFilter::All, sort));
        out.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(sorted(ContactSort::Interactions), vec!["5", "1", "2", "3", "4"]);
    assert_eq!(sorted(ContactSort::Name), vec!["2", "4", "1", "5", "3"]);
    assert_eq!(sorted(ContactSort::Company), vec!["4", "2", "3", "5", "1"]);
    assert_eq!(sorted(ContactSort::LastContact), vec!["4", "3", "2", "1", "5"]);
    assert_eq!(sorted(ContactSort::Natural), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn unknown_category_and_sort_fall_back() {
    let contacts = seed::contacts().expect("contacts");
    let category: ContactFilter = "archived".parse().unwrap_or_default();
    let sort: ContactSort = "popularity".parse().unwrap_or_default();
    let q = ContactQuery::new(category, sort);
    assert!(!q.is_filtered::<Contact>());
    assert_eq!(contact_ids(&filter_and_sort(&contacts, &q)), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn category_and_tags_compose() {
    let contacts = seed::contacts().expect("contacts");
    let q = ContactQuery::new(ContactFilter::Active, ContactSort::Natural).with_tags(["VIP", "Designer"]);
    assert_eq!(contact_ids(&filter_and_sort(&contacts, &q)), vec!["1", "2", "5"]);

    let q = ContactQuery::new(ContactFilter::Starred, ContactSort::Natural).with_tags(["Designer"]);
    assert!(filter_and_sort(&contacts, &q).is_empty());
}

#[test]
fn contact_facets() {
    let contacts = seed::contacts().expect("contacts");
    let tags = all_tags(&contacts);
    assert_eq!(&tags[..3], &["Developer", "Tech", "VIP"]);
    assert_eq!(tags.iter().filter(|t| t.as_str() == "VIP").count(), 1);

    let stats = contact_stats(&contacts);
    assert_eq!((stats.total, stats.active, stats.starred), (5, 3, 3));
}

#[test]
fn inbox_agent_filter_uses_agent_ids() {
    let conversations = seed::conversations().expect("conversations");
    let filter = InboxFilter::from_selection(&[], &["sarah_williams"], &[], true);
    let out = filter_and_sort(&conversations, &InboxQuery::new(filter, InboxSort::Natural));
    assert_eq!(conversation_ids(&out), vec!["1", "4"]);
}

#[test]
fn inbox_unassigned_and_status() {
    let conversations = seed::conversations().expect("conversations");

    let unassigned = InboxFilter::from_selection(&["unassigned"], &[], &[], true);
    let out = filter_and_sort(&conversations, &InboxQuery::new(unassigned, InboxSort::Natural));
    assert_eq!(conversation_ids(&out), vec!["3", "5", "6"]);

    let open = InboxFilter::from_selection(&["open"], &[], &[], true);
    let out = filter_and_sort(&conversations, &InboxQuery::new(open, InboxSort::Natural));
    assert_eq!(conversation_ids(&out), vec!["1", "3", "5"]);
}

#[test]
fn inbox_ai_filter_respects_toggle() {
    let conversations = seed::conversations().expect("conversations");
    let mut filter = InboxFilter::from_selection(&[], &[], &["escalate"], true);
    let out = filter_and_sort(&conversations, &InboxQuery::new(filter.clone(), InboxSort::Natural));
    assert_eq!(conversation_ids(&out), vec!["2", "7"]);

    filter.ai_enabled = false;
    let out = filter_and_sort(&conversations, &InboxQuery::new(filter, InboxSort::Natural));
    assert_eq!(out.len(), 7);
}

#[test]
fn inbox_search_covers_preview_and_sender() {
    let conversations = seed::conversations().expect("conversations");
    let q = InboxQuery::default().with_text("subscription");
    assert_eq!(conversation_ids(&filter_and_sort(&conversations, &q)), vec!["2", "7"]);

    let q = InboxQuery::default().with_text("wilson");
    assert_eq!(conversation_ids(&filter_and_sort(&conversations, &q)), vec!["5"]);
}

#[test]
fn inbox_subject_sort() {
    let conversations = seed::conversations().expect("conversations");
    let out = filter_and_sort(&conversations, &InboxQuery::new(InboxFilter::default(), InboxSort::Subject));
    let subjects: Vec<&str> = out.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects[0], "Billing inquiry");
    assert_eq!(subjects[6], "Unable to login");
}
