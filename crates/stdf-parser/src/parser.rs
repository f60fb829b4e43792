use crate::reader::BodyReader;
use crate::types::*;

const MIR_TEXT_FIELDS: &[&str] = &[
    "LOT_ID", "PART_TYP", "NODE_NAM", "TSTR_TYP", "JOB_NAM", "JOB_REV", "SBLOT_ID", "OPER_NAM",
    "EXEC_TYP", "EXEC_VER", "TEST_COD", "TST_TEMP", "USER_TXT", "AUX_FILE", "PKG_TYP",
    "FAMILY_ID", "DATE_COD", "FLOOR_ID", "PROC_ID", "OPER_FRQ", "SPEC_NAM", "SPEC_VER",
    "FLOW_ID", "SETUP_ID", "DSGN_REV", "ENG_ID", "ROM_COD", "SERL_NUM", "SUPR_NAM",
];

const SDR_TEXT_FIELDS: &[&str] = &[
    "SITE_NUM", "HAND_TYP", "HAND_ID", "CARD_TYP", "CARD_ID", "LOAD_TYP", "LOAD_ID", "DIB_TYP",
    "DIB_ID", "CABL_TYP", "CABL_ID", "CONT_TYP", "CONT_ID", "LASR_TYP", "LASR_ID", "EXTR_TYP",
    "EXTR_ID",
];

const PRR_TEXT_FIELDS: &[&str] = &["PART_ID", "PART_TXT", "PART_FIX"];

/// Decode a File Attributes Record.
pub fn decode_far(body: &[u8]) -> Result<Record, ParseError> {
    let mut r = BodyReader::new(body);
    Ok(Record::Far(Far {
        cpu_type: r.byte()?,
        stdf_ver: r.byte()?,
    }))
}

/// Decode an Audit Trail Record. The command line runs to the end of the body.
pub fn decode_atr(body: &[u8]) -> Result<Record, ParseError> {
    let mut r = BodyReader::new(body);
    let mod_tim = r.epoch()?;
    Ok(Record::Atr(Atr {
        mod_tim,
        cmd_line: r.rest_text(),
    }))
}

/// Decode a Master Information Record.
pub fn decode_mir(body: &[u8]) -> Result<Record, ParseError> {
    let mut r = BodyReader::new(body);
    let setup_t = r.epoch()?;
    let start_t = r.epoch()?;
    let stat_num = r.byte()?;
    let mode_cod = r.char_val()?;
    let rtst_cod = r.char_val()?;
    let prot_cod = r.char_val()?;
    let burn_tim = r.uint16()?;
    let cmod_cod = r.char_val()?;
    let text = r.strings(MIR_TEXT_FIELDS)?;

    Ok(Record::Mir(Mir {
        setup_t,
        start_t,
        stat_num,
        mode_cod,
        rtst_cod,
        prot_cod,
        burn_tim,
        cmod_cod,
        text,
    }))
}

/// Decode a Site Description Record.
pub fn decode_sdr(body: &[u8]) -> Result<Record, ParseError> {
    let mut r = BodyReader::new(body);
    let head_num = r.byte()?;
    let site_grp = r.byte()?;
    let site_cnt = r.byte()? as usize;
    let site_nums = r.bytes(site_cnt)?.to_vec();
    let text = r.strings(SDR_TEXT_FIELDS)?;

    Ok(Record::Sdr(Sdr {
        head_num,
        site_grp,
        site_nums,
        text,
    }))
}

/// Decode a Part Results Record.
pub fn decode_prr(body: &[u8]) -> Result<Record, ParseError> {
    let mut r = BodyReader::new(body);
    let head_num = r.byte()?;
    let site_grp = r.byte()?;
    let part_flg = r.byte()?;
    let num_test = r.uint16()?;
    let hard_bin = r.uint16()?;
    let soft_bin = r.uint16()?;
    let x_coord = r.int16()?;
    let y_coord = r.int16()?;
    let test_t = r.uint32()?;

    let text = r.strings(PRR_TEXT_FIELDS)?;
    let mut text = text.0.into_iter().map(|(_, v)| v);

    Ok(Record::Prr(Prr {
        head_num,
        site_grp,
        part_flg,
        num_test,
        hard_bin,
        soft_bin,
        x_coord,
        y_coord,
        test_t,
        part_id: text.next(),
        part_txt: text.next(),
        part_fix: text.next(),
    }))
}
