use biometrics::{Collector, Counter, Moments};

pub(crate) static PROVIDER_REQUESTS: Counter = Counter::new("brandchat.provider.requests");
pub(crate) static PROVIDER_REQUEST_ERRORS: Counter =
    Counter::new("brandchat.provider.request_errors");
pub(crate) static PROVIDER_STREAM_EVENTS: Counter = Counter::new("brandchat.provider.stream_events");
pub(crate) static PROVIDER_TTFB: Moments = Moments::new("brandchat.provider.ttfb_seconds");

pub(crate) static CHAT_REQUESTS: Counter = Counter::new("brandchat.chat.requests");
pub(crate) static CHAT_REJECTED_INPUT: Counter = Counter::new("brandchat.chat.rejected_input");
pub(crate) static CHAT_MISSING_CREDENTIAL: Counter =
    Counter::new("brandchat.chat.missing_credential");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("brandchat.chat.failures");
pub(crate) static CHAT_FRAGMENTS: Counter = Counter::new("brandchat.chat.fragments");
pub(crate) static CHAT_STREAM_ERRORS: Counter = Counter::new("brandchat.chat.stream_errors");
pub(crate) static CHAT_STREAM_DURATION: Moments =
    Moments::new("brandchat.chat.stream_duration_seconds");

pub(crate) static CONFIG_CACHE_HITS: Counter = Counter::new("brandchat.config.cache_hits");
pub(crate) static CONFIG_FALLBACKS: Counter = Counter::new("brandchat.config.fallbacks");
pub(crate) static BRAND_CONTENT_LOADS: Counter = Counter::new("brandchat.brand.loads");
pub(crate) static BRAND_CONTENT_FAILURES: Counter = Counter::new("brandchat.brand.failures");

pub(crate) static CLIENT_TURNS: Counter = Counter::new("brandchat.client.turns");
pub(crate) static CLIENT_TURN_FAILURES: Counter = Counter::new("brandchat.client.turn_failures");
pub(crate) static CLIENT_STALE_UPDATES: Counter = Counter::new("brandchat.client.stale_updates");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&PROVIDER_REQUESTS);
    collector.register_counter(&PROVIDER_REQUEST_ERRORS);
    collector.register_counter(&PROVIDER_STREAM_EVENTS);
    collector.register_moments(&PROVIDER_TTFB);

    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_REJECTED_INPUT);
    collector.register_counter(&CHAT_MISSING_CREDENTIAL);
    collector.register_counter(&CHAT_FAILURES);
    collector.register_counter(&CHAT_FRAGMENTS);
    collector.register_counter(&CHAT_STREAM_ERRORS);
    collector.register_moments(&CHAT_STREAM_DURATION);

    collector.register_counter(&CONFIG_CACHE_HITS);
    collector.register_counter(&CONFIG_FALLBACKS);
    collector.register_counter(&BRAND_CONTENT_LOADS);
    collector.register_counter(&BRAND_CONTENT_FAILURES);

    collector.register_counter(&CLIENT_TURNS);
    collector.register_counter(&CLIENT_TURN_FAILURES);
    collector.register_counter(&CLIENT_STALE_UPDATES);
}
