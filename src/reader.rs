//! Text result reader.
//!
//! Routes the backend messages of one query response to a [`TextHandler`],
//! and turns an ErrorResponse into a classified [`Failure`](crate::Failure).
//! Socket I/O and ReadyForQuery handling belong to the connection layer; the
//! caller feeds each message's type byte and payload to [`TextResultReader::step`].

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::handler::TextHandler;
use crate::protocol::backend::{
    CommandComplete, DataRow, ErrorResponse, NoticeResponse, RowDescription, msg_type,
};

/// Reader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitingResponse,
    ProcessingRows,
    Failed,
}

/// Feeds one query's response messages into a handler.
pub struct TextResultReader<'a, H> {
    state: State,
    handler: &'a mut H,
    query: Option<&'a str>,
    column_buffer: Vec<u8>,
}

impl<'a, H: TextHandler> TextResultReader<'a, H> {
    /// Create a reader. `query` is attached to classified failures.
    pub fn new(handler: &'a mut H, query: Option<&'a str>) -> Self {
        Self {
            state: State::WaitingResponse,
            handler,
            query,
            column_buffer: Vec::new(),
        }
    }

    /// Process one message.
    ///
    /// An ErrorResponse is returned as `Error::Server`; afterwards every
    /// message except notices is ignored until the caller is done.
    pub fn step(&mut self, type_byte: u8, payload: &[u8]) -> Result<()> {
        match type_byte {
            msg_type::NOTICE_RESPONSE => {
                let notice = NoticeResponse::parse(payload)?;
                tracing::debug!("{}", notice.fields);
                return Ok(());
            }
            msg_type::ERROR_RESPONSE => {
                let mut raw = ErrorResponse::parse(payload)?.into_raw();
                raw.query = self.query.map(str::to_string);
                self.state = State::Failed;
                return Err(Error::Server(classify(&raw)));
            }
            _ => {}
        }

        match self.state {
            State::WaitingResponse => self.handle_response(type_byte, payload),
            State::ProcessingRows => self.handle_rows(type_byte, payload),
            State::Failed => Ok(()),
        }
    }

    fn handle_response(&mut self, type_byte: u8, payload: &[u8]) -> Result<()> {
        match type_byte {
            msg_type::ROW_DESCRIPTION => {
                // Rows are parsed against this copy of the description
                self.column_buffer.clear();
                self.column_buffer.extend_from_slice(payload);
                let cols = RowDescription::parse(&self.column_buffer)?;
                self.handler.result_start(cols)?;
                self.state = State::ProcessingRows;
                Ok(())
            }
            msg_type::COMMAND_COMPLETE => {
                let complete = CommandComplete::parse(payload)?;
                self.handler.result_end(complete)
            }
            // Empty query string - nothing to report
            msg_type::EMPTY_QUERY_RESPONSE => Ok(()),
            _ => Err(Error::Protocol(format!(
                "Unexpected message in query response: '{}'",
                type_byte as char
            ))),
        }
    }

    fn handle_rows(&mut self, type_byte: u8, payload: &[u8]) -> Result<()> {
        match type_byte {
            msg_type::DATA_ROW => {
                let cols = RowDescription::parse(&self.column_buffer)?;
                let row = DataRow::parse(payload)?;
                self.handler.row(cols, row)
            }
            msg_type::COMMAND_COMPLETE => {
                let complete = CommandComplete::parse(payload)?;
                self.handler.result_end(complete)?;
                // More commands may follow in a multi-statement query
                self.state = State::WaitingResponse;
                Ok(())
            }
            _ => Err(Error::Protocol(format!(
                "Unexpected message in row processing: '{}'",
                type_byte as char
            ))),
        }
    }
}
