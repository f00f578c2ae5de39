// Copyright (c) 2023 The ledger-ada Contributors

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    ops::Deref,
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use lazy_static::lazy_static;
use log::LevelFilter;
use serde::Deserialize;
use simplelog::SimpleLogger;

use ledger_ada::{
    apdu::prelude::{ChunkFlags, TxStage, SW_OK, VOTE_P1_WITNESS},
    types::{harden, Bip32Path},
};
use ledger_transport::{async_trait, APDUAnswer, APDUCommand, Exchange};

/// Setup logging from the `LOG_LEVEL` environment variable
pub fn setup_logging() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fixtures {
    pub device: DeviceFixture,
    pub ext_pub_keys: Vec<ExtPubKeyFixture>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeviceFixture {
    pub version: [u8; 4],
    pub serial: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExtPubKeyFixture {
    pub path: String,
    pub public_key: String,
    pub chain_code: String,
}

lazy_static! {
    pub static ref FIXTURES: Fixtures =
        toml::from_str(include_str!("fixtures.toml")).expect("invalid fixtures");
}

/// Parse a `44'/1815'/0'` style derivation path
pub fn path(s: &str) -> Bip32Path {
    s.split('/')
        .map(|e| match e.strip_suffix('\'') {
            Some(i) => harden(i.parse().expect("invalid path index")),
            None => e.parse().expect("invalid path index"),
        })
        .collect()
}

/// Test transport errors
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("device disconnected")]
    Disconnected,
    #[error("invalid answer framing")]
    Framing,
}

fn answer(mut data: Vec<u8>, sw: u16) -> Result<APDUAnswer<Vec<u8>>, SimError> {
    data.extend_from_slice(&sw.to_be_bytes());
    APDUAnswer::from_answer(data).map_err(|_| SimError::Framing)
}

/// Simulated Cardano app, answering from fixtures
#[derive(Clone, Default)]
pub struct SimDevice {
    /// Version override, fixture version if not set
    pub version: Option<[u8; 4]>,
    /// Delay applied to each exchange
    pub delay: Option<Duration>,
    /// Raw command frames received
    pub log: Arc<Mutex<Vec<Vec<u8>>>>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl SimDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(major: u8, minor: u8) -> Self {
        Self {
            version: Some([major, minor, 0, 0]),
            ..Default::default()
        }
    }

    /// Delay each exchange, widening the window for overlapping calls
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// Fetch received command frames
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.log.lock().unwrap().clone()
    }

    /// Fetch (INS, P1, P2) for each received command
    pub fn commands(&self) -> Vec<(u8, u8, u8)> {
        self.frames().iter().map(|f| (f[1], f[2], f[3])).collect()
    }

    /// Maximum number of exchanges observed in flight at once
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn ext_pub_key(data: &[u8]) -> Vec<u8> {
        let n = data[0] as usize;
        let p: Vec<u32> = data[1..1 + n * 4]
            .chunks(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        match FIXTURES.ext_pub_keys.iter().find(|k| path(&k.path) == p) {
            Some(k) => [
                hex::decode(&k.public_key).unwrap(),
                hex::decode(&k.chain_code).unwrap(),
            ]
            .concat(),
            // Deterministic filler for paths without fixtures
            None => {
                let last = p[n - 1].to_be_bytes()[3];
                [vec![last; 32], vec![!last; 32]].concat()
            }
        }
    }

    fn respond(&self, ins: u8, p1: u8, data: &[u8]) -> (Vec<u8>, u16) {
        match (ins, p1) {
            (0x00, _) => (
                self.version.unwrap_or(FIXTURES.device.version).to_vec(),
                SW_OK,
            ),
            (0x01, _) => (hex::decode(&FIXTURES.device.serial).unwrap(), SW_OK),
            (0x10, _) => (Self::ext_pub_key(data), SW_OK),
            (0x11, 0x01) => (vec![data[0] << 4 | 0x01, 0xab, 0xcd, 0xef], SW_OK),
            (0x11, 0x02) => (vec![], SW_OK),
            (0x12, 0x03) => (vec![0x5c; 28], SW_OK),
            (0x12, _) => (vec![], SW_OK),
            (0x21, p1) if p1 == TxStage::Confirm as u8 => (vec![0xa1; 32], SW_OK),
            (0x21, p1) if p1 == TxStage::Witnesses as u8 => (vec![0xb2; 64], SW_OK),
            (0x21, _) => (vec![], SW_OK),
            (0x22, _) => (vec![0xc3; 64], SW_OK),
            (0x23, VOTE_P1_WITNESS) => (vec![0xd4; 64], SW_OK),
            (0x23, p1) if ChunkFlags::from_bits_truncate(p1).contains(ChunkFlags::LAST) => {
                (vec![0xe5; 32], SW_OK)
            }
            (0x23, _) => (vec![], SW_OK),
            _ => (vec![], 0x6d00),
        }
    }
}

#[async_trait]
impl Exchange for SimDevice {
    type Error = SimError;
    type AnswerType = Vec<u8>;

    async fn exchange<I>(
        &self,
        command: &APDUCommand<I>,
    ) -> Result<APDUAnswer<Self::AnswerType>, Self::Error>
    where
        I: Deref<Target = [u8]> + Send + Sync,
    {
        self.log.lock().unwrap().push(command.serialize());

        let n = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(n, Ordering::SeqCst);

        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }

        let (data, sw) = self.respond(command.ins, command.p1, &command.data);

        self.active.fetch_sub(1, Ordering::SeqCst);

        answer(data, sw)
    }
}

/// Transport returning a scripted sequence of raw answers (data and status word)
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    answers: Arc<Mutex<VecDeque<Vec<u8>>>>,
    pub log: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ScriptedTransport {
    pub fn new(answers: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            log: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Fetch received command frames
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.log.lock().unwrap().clone()
    }
}

/// Build a raw answer from response data and a status word
pub fn raw(data: &[u8], sw: u16) -> Vec<u8> {
    [data, &sw.to_be_bytes()[..]].concat()
}

#[async_trait]
impl Exchange for ScriptedTransport {
    type Error = SimError;
    type AnswerType = Vec<u8>;

    async fn exchange<I>(
        &self,
        command: &APDUCommand<I>,
    ) -> Result<APDUAnswer<Self::AnswerType>, Self::Error>
    where
        I: Deref<Target = [u8]> + Send + Sync,
    {
        self.log.lock().unwrap().push(command.serialize());

        let a = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(SimError::Disconnected)?;

        APDUAnswer::from_answer(a).map_err(|_| SimError::Framing)
    }
}
