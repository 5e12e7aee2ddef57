// crates/huaweicm-rs/src/context.rs

//! Mutable state threaded through the XML event dispatch.

use crate::csv::escape_field;

/// `xsi:type`, `netype`, `neversion` and `neid` of the current `<NE>` block.
///
/// Values deliberately persist across sibling `<NE>` blocks (and across
/// files) unless a later block overwrites them; omitted attributes carry
/// over. This matches the behavior CSV consumers of these dumps rely on.
#[derive(Debug, Default)]
pub struct NeAttrs {
    pub xsi_type: String,
    pub netype: String,
    pub neversion: String,
    pub neid: String,
}

/// `xsi:type`, `productversion` and `remark` of the current `<module>` block.
#[derive(Debug, Default)]
pub struct ModuleAttrs {
    pub xsi_type: String,
    pub productversion: String,
    pub remark: String,
}

/// Ordered parameter-name/value map scoped to one `<moi>` block.
///
/// Insertion order is preserved; re-storing an existing name replaces the
/// value in place. Values are stored already CSV-escaped.
#[derive(Debug, Default)]
pub struct ParameterMap {
    entries: Vec<(String, String)>,
}

impl ParameterMap {
    pub fn store(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// All parser state for one conversion run.
///
/// One instance lives for the whole run and is reused by both passes over
/// every input file; only the fields noted below are reset in between.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Base name of the file currently being tokenized.
    pub file_name: String,
    /// Extraction date-time captured from the `filefooter` element.
    /// Process-wide: the last footer seen during discovery wins.
    pub datetime: String,
    pub ne: NeAttrs,
    pub module: ModuleAttrs,
    /// True between `<moi>` and `</moi>`.
    pub in_moi: bool,
    /// `xsi:type` of the current managed-object instance.
    pub moi_type: String,
    /// Parameters of the current instance; cleared at each `</moi>`.
    pub params: ParameterMap,
    /// Text of the current element, accumulated across adjacent text, CDATA
    /// and reference events; consumed by the next leaf end tag. Not cleared
    /// on consumption.
    pub pending_text: String,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header prefix shared by `SUBSESSION_NE` and every per-type table.
    /// The second column label is the captured extraction date-time.
    pub fn header_prefix(&self) -> String {
        format!(
            "FileName,{},ne_xsitype,netype,neversion,neid,module_type,module_remark,module_productversion",
            self.datetime
        )
    }

    /// Row prefix matching [`header_prefix`](Self::header_prefix), with every
    /// field CSV-escaped.
    pub fn row_prefix(&self) -> String {
        [
            self.file_name.as_str(),
            self.datetime.as_str(),
            self.ne.xsi_type.as_str(),
            self.ne.netype.as_str(),
            self.ne.neversion.as_str(),
            self.ne.neid.as_str(),
            self.module.xsi_type.as_str(),
            self.module.remark.as_str(),
            self.module.productversion.as_str(),
        ]
        .iter()
        .map(|v| escape_field(v))
        .collect::<Vec<_>>()
        .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterMap, ParseContext};

    #[test]
    fn test_parameter_map_preserves_order_and_replaces() {
        let mut map = ParameterMap::default();
        map.store("b", "1".to_string());
        map.store("a", "2".to_string());
        map.store("b", "3".to_string());

        assert_eq!(map.names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(map.get("b"), Some("3"));
        assert_eq!(map.get("missing"), None);

        map.clear();
        assert_eq!(map.names().count(), 0);
    }

    #[test]
    fn test_row_prefix_escapes_fields() {
        let mut ctx = ParseContext::new();
        ctx.file_name = "dump.xml".to_string();
        ctx.datetime = "2020-01-01".to_string();
        ctx.ne.xsi_type = "A".to_string();
        ctx.ne.netype = "X,Y".to_string();
        ctx.ne.neversion = "1".to_string();
        ctx.ne.neid = "1".to_string();
        ctx.module.xsi_type = "M".to_string();
        ctx.module.remark = "R".to_string();
        ctx.module.productversion = "P".to_string();

        assert_eq!(
            ctx.row_prefix(),
            "dump.xml,2020-01-01,A,\"X,Y\",1,1,M,R,P"
        );
        assert_eq!(
            ctx.header_prefix(),
            "FileName,2020-01-01,ne_xsitype,netype,neversion,neid,module_type,module_remark,module_productversion"
        );
    }
}
