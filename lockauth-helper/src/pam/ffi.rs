use std::ffi::CStr;
use std::mem;

use libc::{c_int, c_void, calloc, free, size_t, strdup};
use lockauth_ipc::scrambler::Scrambler;
use pam_sys::{PamConversation, PamMessage, PamMessageStyle, PamResponse, PamReturnCode};

use super::Converse;

pub fn make_conversation<C: Converse>(user_converse: &C) -> PamConversation {
    PamConversation {
        conv: Some(converse::<C>),
        data_ptr: user_converse as *const C as *mut c_void,
    }
}

pub extern "C" fn converse<C: Converse>(
    num_msg: c_int,
    msg: *mut *mut PamMessage,
    out_resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int {
    if num_msg <= 0 {
        return PamReturnCode::CONV_ERR as c_int;
    }

    // allocate space for responses
    let resp = unsafe {
        calloc(num_msg as usize, mem::size_of::<PamResponse>() as size_t) as *mut PamResponse
    };
    if resp.is_null() {
        return PamReturnCode::BUF_ERR as c_int;
    }

    let handler = unsafe { &*(appdata_ptr as *const C) };

    let mut result: PamReturnCode = PamReturnCode::SUCCESS;
    for i in 0..num_msg as isize {
        // get indexed values
        let m: &mut PamMessage = unsafe { &mut **(msg.offset(i)) };
        let r: &mut PamResponse = unsafe { &mut *(resp.offset(i)) };
        let msg = unsafe { CStr::from_ptr(m.msg) };
        // match on msg_style
        let answer = match PamMessageStyle::from(m.msg_style) {
            PamMessageStyle::PROMPT_ECHO_ON => handler.prompt_echo(msg).map(Some),
            PamMessageStyle::PROMPT_ECHO_OFF => handler.prompt_blind(msg).map(Some),
            PamMessageStyle::ERROR_MSG => handler.error(msg).map(|_| None),
            PamMessageStyle::TEXT_INFO => handler.info(msg).map(|_| None),
        };
        match answer {
            Ok(Some(s)) => {
                r.resp = unsafe { strdup(s.as_ptr()) };
                if r.resp.is_null() {
                    result = PamReturnCode::BUF_ERR;
                }
                s.into_bytes().scramble();
            }
            Ok(None) => (),
            Err(()) => result = PamReturnCode::CONV_ERR,
        }
        if result != PamReturnCode::SUCCESS {
            break;
        }
    }

    // free allocated memory if an error occured
    if result != PamReturnCode::SUCCESS {
        // Free any strdup'd response strings
        for i in 0..num_msg as isize {
            let r: &mut PamResponse = unsafe { &mut *(resp.offset(i)) };
            if !r.resp.is_null() {
                unsafe { free(r.resp as *mut c_void) };
            }
        }

        // Free the response array
        unsafe { free(resp as *mut c_void) };
    } else {
        unsafe { *out_resp = resp };
    }

    result as c_int
}
