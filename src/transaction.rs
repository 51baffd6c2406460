//! Transaction envelope: a programmable transaction under construction.
//!
//! The envelope is an append-only record of `sui_sdk_types` inputs and
//! commands. It does not check that the command sequence is valid; the
//! Move VM does that at execution. Once built it is handed whole to a
//! signer, so there is no way to submit a subset of its steps.
//!
//! Pure inputs are BCS-encoded. On the JS side the envelope is a plain
//! object with `kind`-tagged inputs, commands and arguments.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::{AddressExt, ObjectDigest, ObjectId, SuiAddress};
use crate::coin_type::{
    parse_type_tag, type_tag_string, Identifier, TypeTag, SUI_FRAMEWORK_ADDRESS,
};
use crate::error::WasmSuiError;
use crate::serde_helpers::{
    address_hex, base64_bytes, digest_base58, option_address_hex, u64_string,
};

pub use sui_sdk_types::{
    Argument, Command, Input, MergeCoins, MoveCall, ObjectReference, SplitCoins, TransferObjects,
};

/// Reference to a shared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedObjectRef {
    pub object_id: ObjectId,
    pub initial_shared_version: u64,
    pub mutable: bool,
}

/// Decoding helpers for transaction inputs.
pub trait InputExt {
    /// Decode a pure `u64` input.
    fn as_u64(&self) -> Option<u64>;
    /// Decode a pure address input.
    fn as_address(&self) -> Option<SuiAddress>;
    /// Id of an object input.
    fn object_id(&self) -> Option<ObjectId>;
}

impl InputExt for Input {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Input::Pure { value } => bcs::from_bytes(value).ok(),
            _ => None,
        }
    }

    fn as_address(&self) -> Option<SuiAddress> {
        match self {
            Input::Pure { value } => bcs::from_bytes::<[u8; 32]>(value)
                .ok()
                .map(SuiAddress::new),
            _ => None,
        }
    }

    fn object_id(&self) -> Option<ObjectId> {
        match self {
            Input::ImmutableOrOwned(r) | Input::Receiving(r) => {
                Some(SuiAddress::from_object_id(r.object_id()))
            }
            Input::Shared { object_id, .. } => Some(SuiAddress::from_object_id(object_id)),
            _ => None,
        }
    }
}

fn identifier(s: &str) -> Result<Identifier, WasmSuiError> {
    Identifier::new(s)
        .map_err(|_| WasmSuiError::InvalidInput(format!("invalid identifier '{}'", s)))
}

/// A call to `package::module::function`.
pub fn move_call(
    package: &ObjectId,
    module: &str,
    function: &str,
    type_arguments: Vec<TypeTag>,
    arguments: Vec<Argument>,
) -> Result<MoveCall, WasmSuiError> {
    Ok(MoveCall {
        package: package.to_object_id(),
        module: identifier(module)?,
        function: identifier(function)?,
        type_arguments,
        arguments,
    })
}

/// `package::module::function` of a call, with the package in short form.
pub fn call_target(call: &MoveCall) -> String {
    full_function_name(
        &SuiAddress::from_object_id(&call.package),
        call.module.as_str(),
        call.function.as_str(),
    )
}

/// Build a `package::module::function` target string.
pub fn full_function_name(package: &ObjectId, module: &str, function: &str) -> String {
    format!("{}::{}::{}", package.to_short_hex(), module, function)
}

/// A transaction under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEnvelope {
    sender: Option<SuiAddress>,
    inputs: Vec<Input>,
    commands: Vec<Command>,
}

impl TransactionEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(sender: SuiAddress) -> Self {
        TransactionEnvelope {
            sender: Some(sender),
            ..Self::default()
        }
    }

    pub fn sender(&self) -> Option<&SuiAddress> {
        self.sender.as_ref()
    }

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.sender = Some(sender);
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.commands.is_empty()
    }

    /// Resolve an `Input` argument to its input.
    pub fn input(&self, arg: Argument) -> Option<&Input> {
        match arg {
            Argument::Input(index) => self.inputs.get(index as usize),
            _ => None,
        }
    }

    /// Append an input. Object inputs are deduplicated by object id.
    pub fn add_input(&mut self, input: Input) -> Result<Argument, WasmSuiError> {
        if let Some(id) = input.object_id() {
            if let Some(pos) = self.inputs.iter().position(|i| i.object_id() == Some(id)) {
                if self.inputs[pos] != input {
                    return Err(WasmSuiError::InvalidInput(format!(
                        "object {} added twice with different references",
                        id
                    )));
                }
                return Ok(Argument::Input(Self::index(pos)?));
            }
        }
        let index = Self::index(self.inputs.len())?;
        self.inputs.push(input);
        Ok(Argument::Input(index))
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<Argument, WasmSuiError> {
        let input = Self::pure(&value)?;
        self.add_input(input)
    }

    pub fn pure_address(&mut self, address: &SuiAddress) -> Result<Argument, WasmSuiError> {
        let input = Self::pure(address.inner())?;
        self.add_input(input)
    }

    pub fn object(&mut self, object_ref: ObjectReference) -> Result<Argument, WasmSuiError> {
        self.add_input(Input::ImmutableOrOwned(object_ref))
    }

    pub fn shared_object(&mut self, object_ref: SharedObjectRef) -> Result<Argument, WasmSuiError> {
        self.add_input(Input::Shared {
            object_id: object_ref.object_id.to_object_id(),
            initial_shared_version: object_ref.initial_shared_version,
            mutable: object_ref.mutable,
        })
    }

    /// Append a move call; returns a reference to its result.
    pub fn add_move_call(&mut self, call: MoveCall) -> Result<Argument, WasmSuiError> {
        self.push(Command::MoveCall(call)).map(Argument::Result)
    }

    /// Merge `sources` into `destination`.
    pub fn add_merge(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> Result<(), WasmSuiError> {
        if sources.is_empty() {
            return Err(WasmSuiError::InvalidInput(
                "merge requires at least one source coin".to_string(),
            ));
        }
        self.push(Command::MergeCoins(MergeCoins {
            coin: destination,
            coins_to_merge: sources,
        }))
        .map(|_| ())
    }

    /// Split one new coin per amount from `coin`.
    ///
    /// Capacity is checked before anything is appended, so a failed split
    /// leaves the envelope unchanged.
    pub fn add_split(
        &mut self,
        coin: Argument,
        amounts: &[u64],
    ) -> Result<Vec<Argument>, WasmSuiError> {
        if amounts.is_empty() {
            return Err(WasmSuiError::InvalidInput(
                "split requires at least one amount".to_string(),
            ));
        }
        let encoded = amounts
            .iter()
            .map(Self::pure)
            .collect::<Result<Vec<_>, _>>()?;
        let index = Self::index(self.commands.len())?;
        let first_input = Self::index(self.inputs.len())?;
        Self::index(self.inputs.len() + encoded.len() - 1)?;

        let amount_args = (0..encoded.len())
            .map(|i| Argument::Input(first_input + i as u16))
            .collect();
        self.inputs.extend(encoded);
        self.commands.push(Command::SplitCoins(SplitCoins {
            coin,
            amounts: amount_args,
        }));
        Ok((0..amounts.len())
            .map(|i| Argument::NestedResult(index, i as u16))
            .collect())
    }

    /// Transfer `objects` to `recipient`.
    pub fn add_transfer(
        &mut self,
        objects: Vec<Argument>,
        recipient: &SuiAddress,
    ) -> Result<(), WasmSuiError> {
        Self::index(self.commands.len())?;
        let address = self.pure_address(recipient)?;
        self.push(Command::TransferObjects(TransferObjects { objects, address }))
            .map(|_| ())
    }

    /// `0x2::coin::zero<T>()`: a coin of type `coin_type` with zero balance.
    pub fn add_zero_coin(&mut self, coin_type: TypeTag) -> Result<Argument, WasmSuiError> {
        let call = move_call(&SUI_FRAMEWORK_ADDRESS, "coin", "zero", vec![coin_type], Vec::new())?;
        self.add_move_call(call)
    }

    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn merges(&self) -> impl Iterator<Item = (&Argument, &[Argument])> {
        self.commands.iter().filter_map(|c| match c {
            Command::MergeCoins(merge) => Some((&merge.coin, merge.coins_to_merge.as_slice())),
            _ => None,
        })
    }

    pub fn splits(&self) -> impl Iterator<Item = (&Argument, &[Argument])> {
        self.commands.iter().filter_map(|c| match c {
            Command::SplitCoins(split) => Some((&split.coin, split.amounts.as_slice())),
            _ => None,
        })
    }

    pub fn transfers(&self) -> impl Iterator<Item = (&[Argument], &Argument)> {
        self.commands.iter().filter_map(|c| match c {
            Command::TransferObjects(transfer) => {
                Some((transfer.objects.as_slice(), &transfer.address))
            }
            _ => None,
        })
    }

    /// Decode the `u64` amounts of a split command's pure inputs.
    pub fn split_amounts(&self, amounts: &[Argument]) -> Option<Vec<u64>> {
        amounts
            .iter()
            .map(|arg| self.input(*arg).and_then(InputExt::as_u64))
            .collect()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, WasmSuiError> {
        Ok(serde_json::to_value(self)?)
    }

    fn pure<T: Serialize + ?Sized>(value: &T) -> Result<Input, WasmSuiError> {
        let value = bcs::to_bytes(value)
            .map_err(|e| WasmSuiError::InvalidInput(format!("failed to encode pure input: {}", e)))?;
        Ok(Input::Pure { value })
    }

    fn push(&mut self, command: Command) -> Result<u16, WasmSuiError> {
        let index = Self::index(self.commands.len())?;
        self.commands.push(command);
        Ok(index)
    }

    fn index(i: usize) -> Result<u16, WasmSuiError> {
        u16::try_from(i)
            .map_err(|_| WasmSuiError::InvalidInput("too many transaction entries".to_string()))
    }
}

// JSON shape handed to the wallet.

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum ArgumentJson {
    GasCoin,
    Input {
        index: u16,
    },
    Result {
        index: u16,
    },
    #[serde(rename_all = "camelCase")]
    NestedResult {
        index: u16,
        result_index: u16,
    },
}

impl From<&Argument> for ArgumentJson {
    fn from(arg: &Argument) -> Self {
        match *arg {
            Argument::Gas => ArgumentJson::GasCoin,
            Argument::Input(index) => ArgumentJson::Input { index },
            Argument::Result(index) => ArgumentJson::Result { index },
            Argument::NestedResult(index, result_index) => {
                ArgumentJson::NestedResult { index, result_index }
            }
        }
    }
}

impl From<ArgumentJson> for Argument {
    fn from(arg: ArgumentJson) -> Self {
        match arg {
            ArgumentJson::GasCoin => Argument::Gas,
            ArgumentJson::Input { index } => Argument::Input(index),
            ArgumentJson::Result { index } => Argument::Result(index),
            ArgumentJson::NestedResult {
                index,
                result_index,
            } => Argument::NestedResult(index, result_index),
        }
    }
}

fn arguments_json(args: &[Argument]) -> Vec<ArgumentJson> {
    args.iter().map(ArgumentJson::from).collect()
}

fn arguments(args: Vec<ArgumentJson>) -> Vec<Argument> {
    args.into_iter().map(Argument::from).collect()
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum InputJson {
    Pure {
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
    },
    #[serde(rename_all = "camelCase")]
    OwnedObject {
        #[serde(with = "address_hex")]
        object_id: ObjectId,
        #[serde(with = "u64_string")]
        version: u64,
        #[serde(with = "digest_base58")]
        digest: ObjectDigest,
    },
    #[serde(rename_all = "camelCase")]
    SharedObject {
        #[serde(with = "address_hex")]
        object_id: ObjectId,
        #[serde(with = "u64_string")]
        initial_shared_version: u64,
        mutable: bool,
    },
}

impl TryFrom<&Input> for InputJson {
    type Error = WasmSuiError;

    fn try_from(input: &Input) -> Result<Self, Self::Error> {
        match input {
            Input::Pure { value } => Ok(InputJson::Pure {
                bytes: value.clone(),
            }),
            Input::ImmutableOrOwned(r) => Ok(InputJson::OwnedObject {
                object_id: SuiAddress::from_object_id(r.object_id()),
                version: r.version(),
                digest: r.digest().clone(),
            }),
            Input::Shared {
                object_id,
                initial_shared_version,
                mutable,
            } => Ok(InputJson::SharedObject {
                object_id: SuiAddress::from_object_id(object_id),
                initial_shared_version: *initial_shared_version,
                mutable: *mutable,
            }),
            _ => Err(WasmSuiError::InvalidInput(
                "unsupported transaction input".to_string(),
            )),
        }
    }
}

impl From<InputJson> for Input {
    fn from(input: InputJson) -> Self {
        match input {
            InputJson::Pure { bytes } => Input::Pure { value: bytes },
            InputJson::OwnedObject {
                object_id,
                version,
                digest,
            } => Input::ImmutableOrOwned(ObjectReference::new(
                object_id.to_object_id(),
                version,
                digest,
            )),
            InputJson::SharedObject {
                object_id,
                initial_shared_version,
                mutable,
            } => Input::Shared {
                object_id: object_id.to_object_id(),
                initial_shared_version,
                mutable,
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum CommandJson {
    #[serde(rename_all = "camelCase")]
    MoveCall {
        #[serde(with = "address_hex")]
        package: ObjectId,
        module: String,
        function: String,
        type_arguments: Vec<String>,
        arguments: Vec<ArgumentJson>,
    },
    MergeCoins {
        destination: ArgumentJson,
        sources: Vec<ArgumentJson>,
    },
    SplitCoins {
        coin: ArgumentJson,
        amounts: Vec<ArgumentJson>,
    },
    TransferObjects {
        objects: Vec<ArgumentJson>,
        address: ArgumentJson,
    },
}

impl TryFrom<&Command> for CommandJson {
    type Error = WasmSuiError;

    fn try_from(command: &Command) -> Result<Self, Self::Error> {
        match command {
            Command::MoveCall(call) => Ok(CommandJson::MoveCall {
                package: SuiAddress::from_object_id(&call.package),
                module: call.module.as_str().to_string(),
                function: call.function.as_str().to_string(),
                type_arguments: call.type_arguments.iter().map(type_tag_string).collect(),
                arguments: arguments_json(&call.arguments),
            }),
            Command::MergeCoins(merge) => Ok(CommandJson::MergeCoins {
                destination: ArgumentJson::from(&merge.coin),
                sources: arguments_json(&merge.coins_to_merge),
            }),
            Command::SplitCoins(split) => Ok(CommandJson::SplitCoins {
                coin: ArgumentJson::from(&split.coin),
                amounts: arguments_json(&split.amounts),
            }),
            Command::TransferObjects(transfer) => Ok(CommandJson::TransferObjects {
                objects: arguments_json(&transfer.objects),
                address: ArgumentJson::from(&transfer.address),
            }),
            _ => Err(WasmSuiError::InvalidInput(
                "unsupported transaction command".to_string(),
            )),
        }
    }
}

impl TryFrom<CommandJson> for Command {
    type Error = WasmSuiError;

    fn try_from(command: CommandJson) -> Result<Self, Self::Error> {
        Ok(match command {
            CommandJson::MoveCall {
                package,
                module,
                function,
                type_arguments,
                arguments: args,
            } => {
                let type_arguments = type_arguments
                    .iter()
                    .map(|t| parse_type_tag(t))
                    .collect::<Result<Vec<_>, _>>()?;
                Command::MoveCall(move_call(
                    &package,
                    &module,
                    &function,
                    type_arguments,
                    arguments(args),
                )?)
            }
            CommandJson::MergeCoins {
                destination,
                sources,
            } => Command::MergeCoins(MergeCoins {
                coin: destination.into(),
                coins_to_merge: arguments(sources),
            }),
            CommandJson::SplitCoins { coin, amounts } => Command::SplitCoins(SplitCoins {
                coin: coin.into(),
                amounts: arguments(amounts),
            }),
            CommandJson::TransferObjects { objects, address } => {
                Command::TransferObjects(TransferObjects {
                    objects: arguments(objects),
                    address: address.into(),
                })
            }
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeJson {
    #[serde(default, with = "option_address_hex")]
    sender: Option<SuiAddress>,
    inputs: Vec<InputJson>,
    commands: Vec<CommandJson>,
}

impl Serialize for TransactionEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inputs = self
            .inputs
            .iter()
            .map(InputJson::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::ser::Error::custom)?;
        let commands = self
            .commands
            .iter()
            .map(CommandJson::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::ser::Error::custom)?;
        EnvelopeJson {
            sender: self.sender,
            inputs,
            commands,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TransactionEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = EnvelopeJson::deserialize(deserializer)?;
        let commands = json
            .commands
            .into_iter()
            .map(Command::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)?;
        Ok(TransactionEnvelope {
            sender: json.sender,
            inputs: json.inputs.into_iter().map(Input::from).collect(),
            commands,
        })
    }
}
