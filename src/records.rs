//! Candidate records and their [`Reconcile`] implementations, plus the small
//! set of direct queries the parsers and dispatcher need.
//!
//! Each candidate owns its natural key: exchange code, (symbol, exchange,
//! active) for instruments, (instrument, date) for bars. Lookups and writes
//! go through Diesel against [`crate::schema`].

use diesel::prelude::*;
use diesel::{QueryResult, SqliteConnection};

use crate::models::{
    Exchange, Instrument, NewExchange, NewInstrument, NewPriceIntraday, NewPriceSession, NewRunLog,
    PriceIntraday, PriceSession,
};
use crate::reconcile::Reconcile;
use crate::schema::{exchange, instrument, price_intraday, price_session, run_log};

/// Display name given to placeholder instruments created by the price loader.
pub const PLACEHOLDER_NAME: &str = "stub";

/// Far-future expiration sentinel for non-option instruments.
pub const EXPIRATION_SENTINEL: &str = "2056-01-01";

/// Insert a `run_log` row and return the new run id.
pub fn insert_run(conn: &mut SqliteConnection, command: &str) -> QueryResult<i32> {
    let started = chrono::Utc::now().to_rfc3339();
    diesel::insert_into(run_log::table)
        .values(&NewRunLog {
            started_at: &started,
            command,
        })
        .returning(run_log::id)
        .get_result(conn)
}

/// Look up an exchange by its short code.
pub fn find_exchange(conn: &mut SqliteConnection, code: &str) -> QueryResult<Option<Exchange>> {
    exchange::table
        .filter(exchange::symbol.eq(code))
        .select(Exchange::as_select())
        .first(conn)
        .optional()
}

/// Look up the active instrument for (symbol, exchange).
pub fn find_active_instrument(
    conn: &mut SqliteConnection,
    symbol: &str,
    exchange_id: i32,
) -> QueryResult<Option<Instrument>> {
    instrument::table
        .filter(
            instrument::symbol
                .eq(symbol)
                .and(instrument::exchange_id.eq(exchange_id))
                .and(instrument::active_flag.eq(true)),
        )
        .select(Instrument::as_select())
        .first(conn)
        .optional()
}

/// Create a placeholder instrument for a symbol the name-list feed has not
/// delivered yet. Option fields take their sentinels; the caller bumps the
/// stub counter so these stay distinguishable from authoritative inserts.
pub fn insert_placeholder_instrument(
    conn: &mut SqliteConnection,
    run_id: i32,
    exchange_id: i32,
    symbol: &str,
) -> QueryResult<Instrument> {
    diesel::insert_into(instrument::table)
        .values(&NewInstrument {
            creation_run_id: run_id,
            exchange_id,
            symbol,
            name: PLACEHOLDER_NAME,
            active_flag: true,
            put_call_flag: false,
            root_symbol_id: 0,
            expiration: EXPIRATION_SENTINEL,
            strike: 0,
        })
        .returning(Instrument::as_returning())
        .get_result(conn)
}

/// Candidate exchange row parsed from an exchange-list document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    /// Short exchange code, the natural key.
    pub symbol: String,
    /// Display name.
    pub name: String,
}

impl Reconcile for ExchangeRecord {
    type Row = Exchange;

    fn find_existing(&self, conn: &mut SqliteConnection) -> QueryResult<Option<Exchange>> {
        find_exchange(conn, &self.symbol)
    }

    fn matches(&self, existing: &Exchange) -> bool {
        existing.symbol == self.symbol && existing.name == self.name
    }

    fn insert(&self, conn: &mut SqliteConnection, run_id: i32) -> QueryResult<Exchange> {
        diesel::insert_into(exchange::table)
            .values(&NewExchange {
                creation_run_id: run_id,
                symbol: &self.symbol,
                name: &self.name,
            })
            .returning(Exchange::as_returning())
            .get_result(conn)
    }

    fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        existing: &Exchange,
        run_id: i32,
    ) -> QueryResult<Exchange> {
        diesel::update(exchange::table.find(existing.id))
            .set((
                exchange::update_run_id.eq(run_id),
                exchange::name.eq(&self.name),
            ))
            .returning(Exchange::as_returning())
            .get_result(conn)
    }
}

/// Candidate instrument row parsed from a name-list document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRecord {
    /// FK to the resolved exchange.
    pub exchange_id: i32,
    /// Ticker symbol, natural key together with the exchange.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Put/call flag; false unless the feed says otherwise.
    pub put_call_flag: bool,
    /// Root symbol id for option chains; 0 when not applicable.
    pub root_symbol_id: i64,
    /// Option expiration date (ISO-8601).
    pub expiration: String,
    /// Option strike in milli-units.
    pub strike: i64,
}

impl InstrumentRecord {
    /// Candidate with the option fields at their sentinels, the shape the
    /// name-list feed delivers.
    pub fn new(exchange_id: i32, symbol: String, name: String) -> Self {
        Self {
            exchange_id,
            symbol,
            name,
            put_call_flag: false,
            root_symbol_id: 0,
            expiration: EXPIRATION_SENTINEL.to_string(),
            strike: 0,
        }
    }
}

impl Reconcile for InstrumentRecord {
    type Row = Instrument;

    fn find_existing(&self, conn: &mut SqliteConnection) -> QueryResult<Option<Instrument>> {
        find_active_instrument(conn, &self.symbol, self.exchange_id)
    }

    fn matches(&self, existing: &Instrument) -> bool {
        existing.exchange_id == self.exchange_id
            && existing.symbol == self.symbol
            && existing.name == self.name
            && existing.put_call_flag == self.put_call_flag
            && existing.root_symbol_id == self.root_symbol_id
            && existing.expiration == self.expiration
            && existing.strike == self.strike
    }

    fn insert(&self, conn: &mut SqliteConnection, run_id: i32) -> QueryResult<Instrument> {
        diesel::insert_into(instrument::table)
            .values(&NewInstrument {
                creation_run_id: run_id,
                exchange_id: self.exchange_id,
                symbol: &self.symbol,
                name: &self.name,
                active_flag: true,
                put_call_flag: self.put_call_flag,
                root_symbol_id: self.root_symbol_id,
                expiration: &self.expiration,
                strike: self.strike,
            })
            .returning(Instrument::as_returning())
            .get_result(conn)
    }

    fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        existing: &Instrument,
        run_id: i32,
    ) -> QueryResult<Instrument> {
        diesel::update(instrument::table.find(existing.id))
            .set((
                instrument::update_run_id.eq(run_id),
                instrument::name.eq(&self.name),
                instrument::put_call_flag.eq(self.put_call_flag),
                instrument::root_symbol_id.eq(self.root_symbol_id),
                instrument::expiration.eq(&self.expiration),
                instrument::strike.eq(self.strike),
            ))
            .returning(Instrument::as_returning())
            .get_result(conn)
    }
}

/// Candidate daily bar parsed from a session price file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBarRecord {
    /// FK to the resolved instrument.
    pub instrument_id: i32,
    /// Session date as "YYYY-MM-DD", natural key together with the instrument.
    pub quote_date: String,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Session volume.
    pub volume: i64,
    /// Open interest; 0 when the feed omits it.
    pub open_interest: i64,
}

impl Reconcile for SessionBarRecord {
    type Row = PriceSession;

    fn find_existing(&self, conn: &mut SqliteConnection) -> QueryResult<Option<PriceSession>> {
        price_session::table
            .filter(
                price_session::instrument_id
                    .eq(self.instrument_id)
                    .and(price_session::quote_date.eq(&self.quote_date)),
            )
            .select(PriceSession::as_select())
            .first(conn)
            .optional()
    }

    fn matches(&self, existing: &PriceSession) -> bool {
        existing.instrument_id == self.instrument_id
            && existing.quote_date == self.quote_date
            && existing.open_price == self.open_price
            && existing.high_price == self.high_price
            && existing.low_price == self.low_price
            && existing.close_price == self.close_price
            && existing.volume == self.volume
            && existing.open_interest == self.open_interest
    }

    fn insert(&self, conn: &mut SqliteConnection, run_id: i32) -> QueryResult<PriceSession> {
        diesel::insert_into(price_session::table)
            .values(&NewPriceSession {
                creation_run_id: run_id,
                instrument_id: self.instrument_id,
                quote_date: &self.quote_date,
                open_price: self.open_price,
                high_price: self.high_price,
                low_price: self.low_price,
                close_price: self.close_price,
                volume: self.volume,
                open_interest: self.open_interest,
            })
            .returning(PriceSession::as_returning())
            .get_result(conn)
    }

    fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        existing: &PriceSession,
        run_id: i32,
    ) -> QueryResult<PriceSession> {
        diesel::update(price_session::table.find(existing.id))
            .set((
                price_session::update_run_id.eq(run_id),
                price_session::open_price.eq(self.open_price),
                price_session::high_price.eq(self.high_price),
                price_session::low_price.eq(self.low_price),
                price_session::close_price.eq(self.close_price),
                price_session::volume.eq(self.volume),
                price_session::open_interest.eq(self.open_interest),
            ))
            .returning(PriceSession::as_returning())
            .get_result(conn)
    }
}

/// Candidate intraday bar; same shape as [`SessionBarRecord`] keyed by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntradayBarRecord {
    /// FK to the resolved instrument.
    pub instrument_id: i32,
    /// Bar timestamp as "YYYY-MM-DDTHH:MM:SS", natural key with the instrument.
    pub bar_time: String,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Bar volume.
    pub volume: i64,
    /// Open interest; 0 when the feed omits it.
    pub open_interest: i64,
}

impl Reconcile for IntradayBarRecord {
    type Row = PriceIntraday;

    fn find_existing(&self, conn: &mut SqliteConnection) -> QueryResult<Option<PriceIntraday>> {
        price_intraday::table
            .filter(
                price_intraday::instrument_id
                    .eq(self.instrument_id)
                    .and(price_intraday::bar_time.eq(&self.bar_time)),
            )
            .select(PriceIntraday::as_select())
            .first(conn)
            .optional()
    }

    fn matches(&self, existing: &PriceIntraday) -> bool {
        existing.instrument_id == self.instrument_id
            && existing.bar_time == self.bar_time
            && existing.open_price == self.open_price
            && existing.high_price == self.high_price
            && existing.low_price == self.low_price
            && existing.close_price == self.close_price
            && existing.volume == self.volume
            && existing.open_interest == self.open_interest
    }

    fn insert(&self, conn: &mut SqliteConnection, run_id: i32) -> QueryResult<PriceIntraday> {
        diesel::insert_into(price_intraday::table)
            .values(&NewPriceIntraday {
                creation_run_id: run_id,
                instrument_id: self.instrument_id,
                bar_time: &self.bar_time,
                open_price: self.open_price,
                high_price: self.high_price,
                low_price: self.low_price,
                close_price: self.close_price,
                volume: self.volume,
                open_interest: self.open_interest,
            })
            .returning(PriceIntraday::as_returning())
            .get_result(conn)
    }

    fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        existing: &PriceIntraday,
        run_id: i32,
    ) -> QueryResult<PriceIntraday> {
        diesel::update(price_intraday::table.find(existing.id))
            .set((
                price_intraday::update_run_id.eq(run_id),
                price_intraday::open_price.eq(self.open_price),
                price_intraday::high_price.eq(self.high_price),
                price_intraday::low_price.eq(self.low_price),
                price_intraday::close_price.eq(self.close_price),
                price_intraday::volume.eq(self.volume),
                price_intraday::open_interest.eq(self.open_interest),
            ))
            .returning(PriceIntraday::as_returning())
            .get_result(conn)
    }
}
