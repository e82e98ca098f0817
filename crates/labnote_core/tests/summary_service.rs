use labnote_core::summary::{ChatRequest, API_KEY_STORE_KEY, SUMMARY_TEMPLATE};
use labnote_core::{
    ChatCompletionClient, KeyValueStore, MemoryKeyValueStore, SummaryError, SummaryService,
    SummarySettings,
};
use std::cell::RefCell;
use std::rc::Rc;

type Calls = Rc<RefCell<Vec<(String, ChatRequest)>>>;

struct FakeClient {
    calls: Calls,
    reply: fn() -> Result<String, SummaryError>,
}

impl ChatCompletionClient for FakeClient {
    fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, SummaryError> {
        self.calls
            .borrow_mut()
            .push((api_key.to_string(), request.clone()));
        (self.reply)()
    }
}

fn ok_reply() -> Result<String, SummaryError> {
    Ok("## Objective\n- test\n## Methods\n## Results\n## Summary / Conclusions".to_string())
}

fn unauthorized_reply() -> Result<String, SummaryError> {
    Err(SummaryError::Http {
        status: 401,
        body: "invalid api key".to_string(),
    })
}

fn service_with(
    store: &mut MemoryKeyValueStore,
    reply: fn() -> Result<String, SummaryError>,
    settings: SummarySettings,
) -> (SummaryService<FakeClient, &mut MemoryKeyValueStore>, Calls) {
    let calls = Calls::default();
    let client = FakeClient {
        calls: Rc::clone(&calls),
        reply,
    };
    (SummaryService::new(client, store, settings), calls)
}

fn report(words: usize) -> String {
    format!(
        "<html><head><script>alert('x')</script></head><body><h1>QC report</h1><p>{}</p></body></html>",
        "reads ".repeat(words)
    )
}

#[test]
fn summarize_sends_extracted_text_with_template() {
    let mut store = MemoryKeyValueStore::new();
    store.set(API_KEY_STORE_KEY, "sk-test").unwrap();
    let (service, calls) = service_with(&mut store, ok_reply, SummarySettings::default());

    let summary = service.summarize(&report(20)).unwrap();
    assert!(summary.starts_with("## Objective"));

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    let (api_key, request) = &calls[0];
    assert_eq!(api_key, "sk-test");
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages[0].content, SUMMARY_TEMPLATE);
    assert_eq!(request.messages[1].role, "user");
    assert!(request.messages[1].content.contains("QC report reads"));
    assert!(!request.messages[1].content.contains("alert"));
    assert!(!request.messages[1].content.contains('<'));
}

#[test]
fn short_report_is_rejected_before_credential_check() {
    let mut store = MemoryKeyValueStore::new();
    let (service, calls) = service_with(&mut store, ok_reply, SummarySettings::default());

    let err = service.summarize("<p>tiny</p>").unwrap_err();
    assert!(matches!(
        err,
        SummaryError::InsufficientText {
            found: 4,
            required: 50
        }
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn missing_credential_is_distinct_error() {
    let mut store = MemoryKeyValueStore::new();
    let (service, calls) = service_with(&mut store, ok_reply, SummarySettings::default());

    let err = service.summarize(&report(20)).unwrap_err();
    assert!(matches!(err, SummaryError::MissingCredential));
    assert!(calls.borrow().is_empty());
}

#[test]
fn http_failure_surfaces_status() {
    let mut store = MemoryKeyValueStore::new();
    store.set(API_KEY_STORE_KEY, "sk-bad").unwrap();
    let (service, _calls) = service_with(&mut store, unauthorized_reply, SummarySettings::default());

    let err = service.summarize(&report(20)).unwrap_err();
    assert_eq!(err.code(), "http_status");
    assert!(err.to_string().contains("HTTP 401"));
}

#[test]
fn error_messages_are_distinct() {
    let messages = [
        SummaryError::InsufficientText {
            found: 1,
            required: 50,
        }
        .to_string(),
        SummaryError::MissingCredential.to_string(),
        SummaryError::Http {
            status: 500,
            body: String::new(),
        }
        .to_string(),
    ];
    assert_ne!(messages[0], messages[1]);
    assert_ne!(messages[1], messages[2]);
    assert_ne!(messages[0], messages[2]);
}

#[test]
fn long_reports_are_truncated() {
    let mut store = MemoryKeyValueStore::new();
    store.set(API_KEY_STORE_KEY, "sk-test").unwrap();
    let settings = SummarySettings {
        max_input_chars: 100,
        ..SummarySettings::default()
    };
    let (service, calls) = service_with(&mut store, ok_reply, settings);

    service.summarize(&report(500)).unwrap();
    let calls = calls.borrow();
    let user_message = &calls[0].1.messages[1].content;
    let prefix = "Experiment report:\n\n";
    assert!(user_message.starts_with(prefix));
    assert_eq!(user_message[prefix.len()..].chars().count(), 100);
}

#[test]
fn api_key_save_trim_and_clear() {
    let mut store = MemoryKeyValueStore::new();
    {
        let (mut service, _calls) = service_with(&mut store, ok_reply, SummarySettings::default());
        assert_eq!(service.api_key().unwrap(), None);

        service.save_api_key("  sk-live  ").unwrap();
        assert_eq!(service.api_key().unwrap().as_deref(), Some("sk-live"));

        service.save_api_key("   ").unwrap();
        assert_eq!(service.api_key().unwrap(), None);
        assert!(!service.clear_api_key().unwrap());
    }
    assert!(store.is_empty());
}
