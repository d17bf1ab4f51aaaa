//! Built-in rule text.
//!
//! These cover the residue every mainstream rich-text editor leaves behind
//! (legacy tags, office-suite style noise, tracking attributes). They are
//! parsed once per conversion run and tagged as system rules, so callers can
//! suppress them with `ignore_system_rules` and user rule files can shadow
//! them by being listed first.

pub const BUILTIN_RULES: &str = r#"
# Built-in normalization rules. One command per line; first match wins.

[ELEMENTS]
REPLACE b WITH strong
REPLACE i WITH em
REPLACE strike WITH s
REPLACE center WITH p
REMOVE font
REMOVE article
REMOVE section
REMOVE script INCLUDING CONTENT
REMOVE style INCLUDING CONTENT
REMOVE meta INCLUDING CONTENT
REMOVE o:p

[ATTRIBUTES]
REMOVE dir IF ltr
REMOVE lang
REMOVE id IF PATTERN ^docs-internal-guid-
REMOVE class IF PATTERN ^Mso
REMOVE align IF left
REMOVE valign IF top
REMOVE target IF _self
MOVE bgcolor TO STYLE
MOVE color TO STYLE

[STYLES]
REMOVE PATTERN ^mso-
REMOVE PATTERN ^-webkit-
REMOVE ANY font-family
REMOVE ANY font-variant
REMOVE ANY line-height
REMOVE ANY orphans
REMOVE ANY widows
REMOVE ANY white-space
REMOVE ANY vertical-align
REMOVE text-decoration: none
REMOVE font-weight: normal
REMOVE font-style: normal
REMOVE background-color: transparent
REMOVE background-color: #ffffff
REMOVE color: #000000
REMOVE margin: 0px
REMOVE padding: 0px
REPLACE font-weight: 700 WITH font-weight: bold
REPLACE font-weight: 400 WITH font-weight: normal

[STYLE_TO_CLASS]
REPLACE EXACT MATCH OF STYLES color: #ff0000 WITH CLASS important
REPLACE PARTIAL MATCH OF STYLES font-family: monospace WITH CLASS code IF ELEMENT span

[URLS]
MAP A PATTERN ^http://(.*)$ TO https://$1
"#;
