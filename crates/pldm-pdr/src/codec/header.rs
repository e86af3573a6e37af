// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PLDM message header (DSP0240)

use super::CodecError;

/// PLDM type for Platform Monitoring and Control.
pub const PLDM_TYPE_PLATFORM: u8 = 0x02;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 3;

/// Largest instance id (5-bit field).
pub const MAX_INSTANCE_ID: u8 = 0x1F;

const RQ_BIT: u8 = 0x80;
const DATAGRAM_BIT: u8 = 0x40;
const INSTANCE_MASK: u8 = 0x1F;
const TYPE_MASK: u8 = 0x3F;

/// Message direction, from the `Rq` and `D` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
    /// Unacknowledged request (`Rq` and `D` both set).
    Datagram,
}

/// PLDM Header (3 bytes)
///
/// ```text
/// byte 0: Rq(7) | D(6) | rsvd(5) | instance id(4:0)
/// byte 1: header version(7:6) | PLDM type(5:0)
/// byte 2: command code
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub kind: MessageKind,
    pub instance_id: u8,
    pub pldm_type: u8,
    pub command: u8,
}

impl MessageHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = HEADER_SIZE;

    /// Platform request header.
    pub fn request(instance_id: u8, command: u8) -> Result<Self, CodecError> {
        Self::new(MessageKind::Request, instance_id, command)
    }

    /// Platform response header.
    pub fn response(instance_id: u8, command: u8) -> Result<Self, CodecError> {
        Self::new(MessageKind::Response, instance_id, command)
    }

    fn new(kind: MessageKind, instance_id: u8, command: u8) -> Result<Self, CodecError> {
        if instance_id > MAX_INSTANCE_ID {
            return Err(CodecError::InvalidInstanceId(instance_id));
        }
        Ok(Self {
            kind,
            instance_id,
            pldm_type: PLDM_TYPE_PLATFORM,
            command,
        })
    }

    /// Encode the header into the first three bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::BufferTooSmall {
                needed: Self::SIZE,
                available: buf.len(),
            });
        }

        let direction = match self.kind {
            MessageKind::Request => RQ_BIT,
            MessageKind::Response => 0,
            MessageKind::Datagram => RQ_BIT | DATAGRAM_BIT,
        };
        buf[0] = direction | (self.instance_id & INSTANCE_MASK);
        buf[1] = self.pldm_type & TYPE_MASK;
        buf[2] = self.command;

        Ok(Self::SIZE)
    }

    /// Decode a header from the front of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        super::ensure_len(buf, Self::SIZE)?;

        let kind = match (buf[0] & RQ_BIT != 0, buf[0] & DATAGRAM_BIT != 0) {
            (true, false) => MessageKind::Request,
            (true, true) => MessageKind::Datagram,
            (false, _) => MessageKind::Response,
        };

        let version = buf[1] >> 6;
        if version != 0 {
            return Err(CodecError::UnsupportedHeaderVersion(version));
        }

        Ok(Self {
            kind,
            instance_id: buf[0] & INSTANCE_MASK,
            pldm_type: buf[1] & TYPE_MASK,
            command: buf[2],
        })
    }

    /// Check that this is a Platform message of `kind` carrying `command`.
    pub fn expect(&self, kind: MessageKind, command: u8) -> Result<(), CodecError> {
        if self.kind != kind {
            return Err(CodecError::UnexpectedDirection { expected: kind });
        }
        if self.pldm_type != PLDM_TYPE_PLATFORM {
            return Err(CodecError::UnexpectedType(self.pldm_type));
        }
        if self.command != command {
            return Err(CodecError::UnexpectedCommand {
                expected: command,
                actual: self.command,
            });
        }
        Ok(())
    }
}
