//! Legacy transaction wire format for a single System Program transfer.

use crate::error::TransactionError;
use crate::keys::{Keypair, Pubkey, Signature};

pub type Lamports = u64;

pub const LAMPORTS_PER_SOL: Lamports = 1_000_000_000;

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// System Program instruction index for `Transfer`.
const SYSTEM_TRANSFER_TAG: u32 = 2;

/// Recent blockhash a transaction is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blockhash(pub [u8; 32]);

impl Blockhash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::str::FromStr for Blockhash {
    type Err = crate::error::KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Same 32-byte base58 encoding as a public key.
        let key: Pubkey = s.parse()?;
        Ok(Self(key.to_bytes()))
    }
}

impl std::fmt::Display for Blockhash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compiles a one-instruction transfer. The sender pays fees; a
    /// self-transfer lists the sender once and references it twice.
    pub fn new_transfer(
        from: &Pubkey,
        to: &Pubkey,
        lamports: Lamports,
        recent_blockhash: Blockhash,
    ) -> Self {
        let mut account_keys = vec![*from];
        let to_index = if from == to {
            0
        } else {
            account_keys.push(*to);
            1
        };
        account_keys.push(SYSTEM_PROGRAM_ID);
        let program_id_index = (account_keys.len() - 1) as u8;

        Self {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            },
            account_keys,
            recent_blockhash,
            instructions: vec![CompiledInstruction {
                program_id_index,
                accounts: vec![0, to_index],
                data: transfer_instruction_data(lamports),
            }],
        }
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.account_keys[0]
    }

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let mut out = Vec::with_capacity(256);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_length(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_length(&mut out, self.instructions.len())?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(&mut out, ix.accounts.len())?;
            out.extend_from_slice(&ix.accounts);
            encode_length(&mut out, ix.data.len())?;
            out.extend_from_slice(&ix.data);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    pub fn new_unsigned(message: Message) -> Self {
        Self {
            signatures: Vec::new(),
            message,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signatures.len() == self.message.header.num_required_signatures as usize
    }

    pub fn sign(&mut self, keypair: &Keypair) -> Result<Signature, TransactionError> {
        let signer = keypair.pubkey();
        if &signer != self.message.fee_payer() {
            return Err(TransactionError::WrongSigner {
                signer: signer.to_string(),
                fee_payer: self.message.fee_payer().to_string(),
            });
        }
        let signature = keypair.sign_message(&self.message.serialize()?);
        self.signatures = vec![signature];
        Ok(signature)
    }

    /// The first signature identifies the transaction on chain.
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        if !self.is_signed() {
            return Err(TransactionError::Unsigned);
        }
        let message = self.message.serialize()?;
        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + message.len());
        encode_length(&mut out, self.signatures.len())?;
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    pub fn to_base58(&self) -> Result<String, TransactionError> {
        Ok(bs58::encode(self.serialize()?).into_string())
    }
}

pub fn transfer_instruction_data(lamports: Lamports) -> Vec<u8> {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data
}

/// Compact-u16 length prefix: seven bits per byte, high bit set while more follow.
pub fn encode_length(out: &mut Vec<u8>, len: usize) -> Result<(), TransactionError> {
    let mut rem = u16::try_from(len).map_err(|_| TransactionError::TooLong(len))?;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        out.push(byte);
    }
}
