//! Shared fixtures and in-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;

use crate::address::{AddressExt, ObjectDigest, ObjectId, SuiAddress};
use crate::coin_type::{CoinType, SUI_TYPE_ARG};
use crate::coins::{CoinObject, CoinSource};
use crate::error::WasmSuiError;
use crate::executor::{ExecutionResponse, TransactionExecutor};
use crate::transaction::{
    call_target, Argument, Command, Input, InputExt, MergeCoins, MoveCall, SharedObjectRef,
    SplitCoins, TransactionEnvelope, TransferObjects,
};
use crate::vault::{Vault, VaultRegistry, DEFAULT_VAULT_MODULE};

pub const USDC_TYPE: &str =
    "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";
pub const JUSD_TYPE: &str =
    "0xce3201eab9a726748eb46dd16fa20005dadcc287d066f845c2f3e163d3bc090c::jusd::JUSD";
pub const VAULT_PACKAGE: &str =
    "0xce3201eab9a726748eb46dd16fa20005dadcc287d066f845c2f3e163d3bc090c";

pub fn owner() -> SuiAddress {
    SuiAddress::new([0xaa; 32])
}

pub fn sui() -> CoinType {
    CoinType::parse(SUI_TYPE_ARG).unwrap()
}

pub fn usdc() -> CoinType {
    CoinType::parse(USDC_TYPE).unwrap()
}

pub fn jusd() -> CoinType {
    CoinType::parse(JUSD_TYPE).unwrap()
}

/// Coin object `n` with the given balance; the listing does not report its type.
pub fn coin(n: u8, balance: u64) -> CoinObject {
    CoinObject {
        object_id: SuiAddress::new([n; 32]),
        version: n as u64,
        digest: ObjectDigest::new([n; 32]),
        balance,
        coin_type: None,
    }
}

pub fn jusd_vault() -> Vault {
    Vault {
        package_id: SuiAddress::parse_padded(VAULT_PACKAGE).unwrap(),
        module: DEFAULT_VAULT_MODULE.to_string(),
        factory: SharedObjectRef {
            object_id: SuiAddress::new([0x77; 32]),
            initial_shared_version: 12,
            mutable: true,
        },
        coin_type: jusd(),
        underlying: usdc(),
    }
}

pub fn registry() -> VaultRegistry {
    let mut registry = VaultRegistry::new();
    registry.register(jusd_vault()).unwrap();
    registry
}

/// Coin listing backed by a map, counting how often it is queried.
#[derive(Default)]
pub struct MemoryCoinSource {
    coins: HashMap<(SuiAddress, CoinType), Vec<CoinObject>>,
    failure: Option<String>,
    calls: Cell<usize>,
}

impl MemoryCoinSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coins(mut self, owner: SuiAddress, coin_type: CoinType, coins: Vec<CoinObject>) -> Self {
        self.coins.insert((owner, coin_type), coins);
        self
    }

    /// Every listing fails with a transport error.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl CoinSource for MemoryCoinSource {
    async fn list_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, WasmSuiError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(message) = &self.failure {
            return Err(WasmSuiError::Transport(message.clone()));
        }
        Ok(self
            .coins
            .get(&(*owner, coin_type.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Executor that records what it was given and answers with a fixed result.
pub struct RecordingExecutor {
    result: Result<String, WasmSuiError>,
    submitted: RefCell<Vec<TransactionEnvelope>>,
}

impl RecordingExecutor {
    pub fn succeeding(digest: &str) -> Self {
        RecordingExecutor {
            result: Ok(digest.to_string()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: WasmSuiError) -> Self {
        RecordingExecutor {
            result: Err(error),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn submitted(&self) -> Vec<TransactionEnvelope> {
        self.submitted.borrow().clone()
    }
}

#[async_trait(?Send)]
impl TransactionExecutor for RecordingExecutor {
    async fn sign_and_execute(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<ExecutionResponse, WasmSuiError> {
        self.submitted.borrow_mut().push(envelope);
        self.result.clone().map(|digest| ExecutionResponse {
            digest,
            effects: serde_json::Value::Null,
        })
    }
}

#[derive(Debug, Clone)]
struct LedgerCoin {
    owner: SuiAddress,
    coin_type: CoinType,
    object: CoinObject,
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    coins: Vec<LedgerCoin>,
    gas: HashMap<SuiAddress, u64>,
    next_id: u8,
    executed: usize,
}

impl LedgerState {
    fn create(&mut self, owner: SuiAddress, coin_type: CoinType, balance: u64) {
        self.next_id += 1;
        let n = self.next_id;
        self.coins.push(LedgerCoin {
            owner,
            coin_type,
            object: CoinObject {
                object_id: SuiAddress::new([n; 32]),
                version: 1,
                digest: ObjectDigest::new([n; 32]),
                balance,
                coin_type: None,
            },
        });
    }

    fn position(&self, id: &ObjectId) -> Option<usize> {
        self.coins.iter().position(|c| c.object.object_id == *id)
    }

    fn remove(&mut self, id: &ObjectId) {
        if let Some(pos) = self.position(id) {
            self.coins.remove(pos);
        }
    }
}

#[derive(Debug, Clone)]
enum SimValue {
    Coin {
        coin_type: CoinType,
        balance: u64,
        origin: Option<ObjectId>,
    },
    Pure(Input),
    Factory,
}

/// Value-table key for an argument.
type Slot = (u8, u16, u16);

fn slot(arg: &Argument) -> Slot {
    match *arg {
        Argument::Gas => (0, 0, 0),
        Argument::Input(i) => (1, i, 0),
        Argument::Result(i) => (2, i, 0),
        Argument::NestedResult(i, j) => (3, i, j),
    }
}

fn fail(message: impl Into<String>) -> WasmSuiError {
    WasmSuiError::Execution(message.into())
}

/// A toy ledger that lists coins and executes envelopes against them.
///
/// Vault calls exchange base units 1:1 and abort on a zero deposit. Values
/// left unconsumed at the end abort the transaction, as Move would for a
/// coin without `drop`. A failed execution leaves the state unchanged.
#[derive(Default)]
pub struct SimulatedLedger {
    state: RefCell<LedgerState>,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coin(self, owner: SuiAddress, coin_type: CoinType, balance: u64) -> Self {
        self.state.borrow_mut().create(owner, coin_type, balance);
        self
    }

    pub fn with_gas(self, owner: SuiAddress, balance: u64) -> Self {
        self.state.borrow_mut().gas.insert(owner, balance);
        self
    }

    pub fn balance(&self, owner: &SuiAddress, coin_type: &CoinType) -> u64 {
        if coin_type.is_sui() {
            return self.state.borrow().gas.get(owner).copied().unwrap_or(0);
        }
        self.state
            .borrow()
            .coins
            .iter()
            .filter(|c| c.owner == *owner && c.coin_type == *coin_type)
            .map(|c| c.object.balance)
            .sum()
    }

    pub fn coin_count(&self, owner: &SuiAddress, coin_type: &CoinType) -> usize {
        self.state
            .borrow()
            .coins
            .iter()
            .filter(|c| c.owner == *owner && c.coin_type == *coin_type)
            .count()
    }

    fn execute(&self, tx: &TransactionEnvelope) -> Result<usize, WasmSuiError> {
        let sender = *tx.sender().ok_or_else(|| fail("missing sender"))?;
        let mut state = self.state.borrow().clone();
        let mut values: HashMap<Slot, SimValue> = HashMap::new();

        for (i, input) in tx.inputs().iter().enumerate() {
            let value = match input {
                Input::Pure { .. } => SimValue::Pure(input.clone()),
                Input::Shared { .. } => SimValue::Factory,
                Input::ImmutableOrOwned(r) => {
                    let id = SuiAddress::from_object_id(r.object_id());
                    let pos = state
                        .position(&id)
                        .ok_or_else(|| fail(format!("object {} not found", id)))?;
                    let owned = &state.coins[pos];
                    if owned.owner != sender {
                        return Err(fail(format!("object {} not owned by sender", id)));
                    }
                    if owned.object.version != r.version() {
                        return Err(fail(format!("object {} version mismatch", id)));
                    }
                    SimValue::Coin {
                        coin_type: owned.coin_type.clone(),
                        balance: owned.object.balance,
                        origin: Some(id),
                    }
                }
                _ => return Err(fail("unsupported input")),
            };
            values.insert(slot(&Argument::Input(i as u16)), value);
        }
        let gas = state.gas.get(&sender).copied().unwrap_or(0);
        values.insert(
            slot(&Argument::Gas),
            SimValue::Coin {
                coin_type: sui(),
                balance: gas,
                origin: None,
            },
        );

        for (i, command) in tx.commands().iter().enumerate() {
            let index = i as u16;
            match command {
                Command::MoveCall(call) => {
                    let result = Self::move_call(call, &mut values, &mut state)?;
                    values.insert(slot(&Argument::Result(index)), result);
                }
                Command::MergeCoins(MergeCoins {
                    coin,
                    coins_to_merge,
                }) => {
                    let mut merged = 0u64;
                    let expected = coin_of(&values, coin)?.0;
                    for source in coins_to_merge {
                        let (coin_type, balance) = take_coin(&mut values, &mut state, source)?;
                        if coin_type != expected {
                            return Err(fail("merge of different coin types"));
                        }
                        merged += balance;
                    }
                    add_balance(&mut values, coin, merged)?;
                }
                Command::SplitCoins(SplitCoins { coin, amounts }) => {
                    let coin_type = coin_of(&values, coin)?.0;
                    for (j, amount) in amounts.iter().enumerate() {
                        let amount = pure(&values, amount)?
                            .as_u64()
                            .ok_or_else(|| fail("split amount is not a u64"))?;
                        sub_balance(&mut values, coin, amount)?;
                        values.insert(
                            slot(&Argument::NestedResult(index, j as u16)),
                            SimValue::Coin {
                                coin_type: coin_type.clone(),
                                balance: amount,
                                origin: None,
                            },
                        );
                    }
                }
                Command::TransferObjects(TransferObjects { objects, address }) => {
                    let recipient = pure(&values, address)?
                        .as_address()
                        .ok_or_else(|| fail("recipient is not an address"))?;
                    for object in objects {
                        let (coin_type, balance) = take_coin(&mut values, &mut state, object)?;
                        state.create(recipient, coin_type, balance);
                    }
                }
                _ => return Err(fail("unsupported command")),
            }
        }

        for (key, value) in values {
            if let SimValue::Coin {
                balance, origin, ..
            } = value
            {
                match (key, origin) {
                    ((0, _, _), _) => {
                        state.gas.insert(sender, balance);
                    }
                    (_, Some(id)) => {
                        let pos = state.position(&id).ok_or_else(|| fail("object vanished"))?;
                        let coin = &mut state.coins[pos].object;
                        coin.balance = balance;
                        coin.version += 1;
                    }
                    (_, None) => {
                        return Err(fail(format!("unused value without drop: {:?}", key)));
                    }
                }
            }
        }

        state.executed += 1;
        let executed = state.executed;
        *self.state.borrow_mut() = state;
        Ok(executed)
    }

    fn move_call(
        call: &MoveCall,
        values: &mut HashMap<Slot, SimValue>,
        state: &mut LedgerState,
    ) -> Result<SimValue, WasmSuiError> {
        let target = call_target(call);
        let type_arg = |i: usize| {
            call.type_arguments
                .get(i)
                .and_then(CoinType::from_type_tag)
                .ok_or_else(|| fail(format!("{}: missing type argument {}", target, i)))
        };
        match (call.module.as_str(), call.function.as_str()) {
            ("coin", "zero") => Ok(SimValue::Coin {
                coin_type: type_arg(0)?,
                balance: 0,
                origin: None,
            }),
            (_, "mint") | (_, "burn") => {
                let (input_type, output_type) = (type_arg(0)?, type_arg(1)?);
                match call.arguments.first().and_then(|a| values.get(&slot(a))) {
                    Some(SimValue::Factory) => {}
                    _ => return Err(fail("first argument must be the factory")),
                }
                let coin = call
                    .arguments
                    .get(1)
                    .ok_or_else(|| fail("missing coin argument"))?;
                let (coin_type, balance) = take_coin(values, state, coin)?;
                if coin_type != input_type {
                    return Err(fail(format!("{}: coin type mismatch", target)));
                }
                if balance == 0 {
                    return Err(fail(format!("{}: zero amount", target)));
                }
                Ok(SimValue::Coin {
                    coin_type: output_type,
                    balance,
                    origin: None,
                })
            }
            _ => Err(fail(format!("unknown function {}", target))),
        }
    }
}

fn coin_of(
    values: &HashMap<Slot, SimValue>,
    arg: &Argument,
) -> Result<(CoinType, u64), WasmSuiError> {
    match values.get(&slot(arg)) {
        Some(SimValue::Coin {
            coin_type, balance, ..
        }) => Ok((coin_type.clone(), *balance)),
        _ => Err(fail(format!("{:?} is not a coin", arg))),
    }
}

fn pure<'a>(
    values: &'a HashMap<Slot, SimValue>,
    arg: &Argument,
) -> Result<&'a Input, WasmSuiError> {
    match values.get(&slot(arg)) {
        Some(SimValue::Pure(value)) => Ok(value),
        _ => Err(fail(format!("{:?} is not a pure value", arg))),
    }
}

fn add_balance(
    values: &mut HashMap<Slot, SimValue>,
    arg: &Argument,
    amount: u64,
) -> Result<(), WasmSuiError> {
    match values.get_mut(&slot(arg)) {
        Some(SimValue::Coin { balance, .. }) => {
            *balance += amount;
            Ok(())
        }
        _ => Err(fail(format!("{:?} is not a coin", arg))),
    }
}

fn sub_balance(
    values: &mut HashMap<Slot, SimValue>,
    arg: &Argument,
    amount: u64,
) -> Result<(), WasmSuiError> {
    match values.get_mut(&slot(arg)) {
        Some(SimValue::Coin { balance, .. }) if *balance >= amount => {
            *balance -= amount;
            Ok(())
        }
        Some(SimValue::Coin { .. }) => Err(fail("insufficient coin balance for split")),
        _ => Err(fail(format!("{:?} is not a coin", arg))),
    }
}

/// Move a coin out of the value table, deleting its on-ledger object.
fn take_coin(
    values: &mut HashMap<Slot, SimValue>,
    state: &mut LedgerState,
    arg: &Argument,
) -> Result<(CoinType, u64), WasmSuiError> {
    if matches!(arg, Argument::Gas) {
        return Err(fail("gas coin cannot be moved"));
    }
    match values.remove(&slot(arg)) {
        Some(SimValue::Coin {
            coin_type,
            balance,
            origin,
        }) => {
            if let Some(id) = origin {
                state.remove(&id);
            }
            Ok((coin_type, balance))
        }
        _ => Err(fail(format!("{:?} is not an available coin", arg))),
    }
}

#[async_trait(?Send)]
impl CoinSource for SimulatedLedger {
    async fn list_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, WasmSuiError> {
        Ok(self
            .state
            .borrow()
            .coins
            .iter()
            .filter(|c| c.owner == *owner && c.coin_type == *coin_type)
            .map(|c| CoinObject {
                coin_type: Some(c.coin_type.clone()),
                ..c.object.clone()
            })
            .collect())
    }
}

#[async_trait(?Send)]
impl TransactionExecutor for SimulatedLedger {
    async fn sign_and_execute(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<ExecutionResponse, WasmSuiError> {
        let executed = self.execute(&envelope)?;
        Ok(ExecutionResponse {
            digest: ObjectDigest::new([executed as u8; 32]).to_string(),
            effects: serde_json::json!({ "status": "success" }),
        })
    }
}
