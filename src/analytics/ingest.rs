use super::{
    classify_user_agent, events_table, ClientContext, DiagnosticRecord, ListenEvent,
    DIAGNOSTIC_LOGS_TABLE, LISTEN_COUNTS_TABLE, QUALIFYING_EVENT, STATS_BROWSERS_TABLE,
    STATS_COUNTRIES_TABLE, STATS_DEVICES_TABLE, STATS_OS_TABLE,
};
use crate::counter_store::StoreWrite;
use chrono::{DateTime, SecondsFormat, Utc};

/// Builds the atomic write batch for one listen event.
///
/// Every event bumps its own `events:<trackId>` sub-counter and the four
/// audience counters, and appends one diagnostic record; only the qualifying
/// event type touches the primary play counter.
pub fn build_listen_batch(
    event: &ListenEvent,
    client: &ClientContext,
    recorded_at: DateTime<Utc>,
) -> Result<Vec<StoreWrite>, serde_json::Error> {
    let agent = classify_user_agent(&client.user_agent);
    let timestamp = recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut batch = Vec::with_capacity(7);

    if event.event_type == QUALIFYING_EVENT {
        batch.push(StoreWrite::increment(
            LISTEN_COUNTS_TABLE,
            event.track_id.as_str(),
        ));
    }

    batch.push(StoreWrite::increment(
        events_table(&event.track_id),
        event.event_type.as_str(),
    ));

    batch.push(StoreWrite::increment(STATS_BROWSERS_TABLE, agent.browser));
    batch.push(StoreWrite::increment(STATS_OS_TABLE, agent.os));
    batch.push(StoreWrite::increment(STATS_DEVICES_TABLE, agent.device));
    batch.push(StoreWrite::increment(
        STATS_COUNTRIES_TABLE,
        client.country.as_str(),
    ));

    let record = DiagnosticRecord {
        ip: client.ip.clone(),
        country: client.country.clone(),
        user_agent: client.short_user_agent().to_string(),
        track_id: event.track_id.clone(),
        event_type: event.event_type.clone(),
        timestamp: timestamp.clone(),
    };
    batch.push(StoreWrite::append(
        DIAGNOSTIC_LOGS_TABLE,
        format!("{}-{}", timestamp, client.short_ip()),
        serde_json::to_string(&record)?,
    ));

    Ok(batch)
}
